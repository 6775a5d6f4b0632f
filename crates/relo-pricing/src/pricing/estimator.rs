//! The price estimator: wires base price resolution, rule application,
//! handicap application, breakdown, and fingerprinting into one
//! deterministic calculation.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::base_price::resolve_base_price;
use crate::pricing::breakdown;
use crate::pricing::domain::{
    round_to_cents, EstimateId, EstimateInput, EstimateMetadata, EstimateResult,
};
use crate::pricing::handicaps;
use crate::pricing::hashing::{self, HashAlgorithm};
use crate::pricing::rule_applier;
use crate::pricing::rules::{LocationHandicap, PricingRule};
use crate::pricing::sizing::{self, SizingRecommendation};
use crate::pricing::tariffs::TariffSettings;

const CALCULATED_BY: &str = "relo-pricing-engine";

/// Everything that parameterizes pricing: rules, handicaps, optional
/// tariff tables, and the configuration version stamped into results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub rules: Vec<PricingRule>,
    pub handicaps: Vec<LocationHandicap>,
    pub tariffs: Option<TariffSettings>,
    pub rules_version: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            handicaps: Vec::new(),
            tariffs: None,
            rules_version: 1,
        }
    }
}

/// Failures that abort a calculation outright. Everything else the
/// engine absorbs through fallbacks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimateError {
    #[error("unrecognized service type; expected local, long_distance, storage, or packing_only")]
    UnknownService,
    #[error("numeric inputs must be finite: {field}")]
    NonFiniteInput { field: &'static str },
}

/// Source of estimate identifiers. Swapped out in tests to keep results
/// reproducible.
pub trait EstimateIdSource: Send + Sync {
    fn next_estimate_id(&self) -> EstimateId;
}

/// Default id source backed by random v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidEstimateIds;

impl EstimateIdSource for UuidEstimateIds {
    fn next_estimate_id(&self) -> EstimateId {
        EstimateId(format!("est-{}", uuid::Uuid::new_v4()))
    }
}

/// Deterministic pricing engine. Construction filters out inactive rules
/// and handicaps and fixes the rule order by ascending priority, so each
/// calculation is a pure pass over stable data.
pub struct PriceEstimator {
    rules: Vec<PricingRule>,
    handicaps: Vec<LocationHandicap>,
    tariffs: Option<TariffSettings>,
    rules_version: u32,
    hash_algorithm: HashAlgorithm,
    ids: Arc<dyn EstimateIdSource>,
}

impl PriceEstimator {
    pub fn new(config: PricingConfig) -> Self {
        let mut rules: Vec<PricingRule> = config
            .rules
            .into_iter()
            .filter(|rule| rule.is_active)
            .collect();
        // Stable sort keeps configuration order among equal priorities.
        rules.sort_by_key(|rule| rule.priority);
        let handicaps = config
            .handicaps
            .into_iter()
            .filter(|handicap| handicap.is_active)
            .collect();

        Self {
            rules,
            handicaps,
            tariffs: config.tariffs,
            rules_version: config.rules_version,
            hash_algorithm: HashAlgorithm::default(),
            ids: Arc::new(UuidEstimateIds),
        }
    }

    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = algorithm;
        self
    }

    pub fn with_id_source(mut self, ids: Arc<dyn EstimateIdSource>) -> Self {
        self.ids = ids;
        self
    }

    /// Active rules in evaluation order.
    pub fn rules(&self) -> &[PricingRule] {
        &self.rules
    }

    /// Active handicaps in configuration order.
    pub fn handicaps(&self) -> &[LocationHandicap] {
        &self.handicaps
    }

    /// Prices one input. Every price-affecting step is deterministic;
    /// only the estimate id and the generation timestamp vary between
    /// calls with equal input.
    pub fn calculate_estimate(
        &self,
        input: &EstimateInput,
    ) -> Result<EstimateResult, EstimateError> {
        ensure_finite(input)?;

        let base = resolve_base_price(input, self.tariffs.as_ref())?;
        tracing::debug!(amount = base.amount, via = ?base.via, "resolved base price");
        let mut current_price = base.amount;

        let mut applied_rules = Vec::new();
        for rule in &self.rules {
            if !rule_applier::should_apply(rule, input) {
                continue;
            }
            let applied = rule_applier::apply(rule, input, current_price);
            current_price += applied.price_impact;
            tracing::debug!(
                rule_id = %applied.rule_id,
                impact = applied.price_impact,
                "applied pricing rule"
            );
            applied_rules.push(applied);
        }

        let mut applied_handicaps = Vec::new();
        for handicap in &self.handicaps {
            if !handicaps::should_apply(handicap, input) {
                continue;
            }
            let applied = handicaps::apply(handicap, input, self.tariffs.as_ref(), current_price);
            current_price += applied.impact;
            tracing::debug!(
                handicap_id = %applied.handicap_id,
                impact = applied.impact,
                "applied location handicap"
            );
            applied_handicaps.push(applied);
        }

        let final_price = round_to_cents(current_price);
        let composed =
            breakdown::compose(base.amount, &applied_rules, &applied_handicaps, final_price);
        let input_hash = hashing::input_hash(input, self.hash_algorithm);

        Ok(EstimateResult {
            estimate_id: self.ids.next_estimate_id(),
            input: input.clone(),
            base_price: base.amount,
            applied_rules,
            applied_location_handicaps: applied_handicaps,
            final_price,
            breakdown: composed,
            metadata: EstimateMetadata {
                generated_at: Utc::now(),
                calculated_by: CALCULATED_BY.to_string(),
                rules_version: self.rules_version,
                deterministic: true,
                input_hash,
            },
        })
    }

    /// Staffing recommendation for a job volume, using the tariff sizing
    /// tables when configured.
    pub fn sizing(&self, cubic_feet: f64, crew_size: Option<u32>) -> SizingRecommendation {
        sizing::recommend(cubic_feet, crew_size, self.tariffs.as_ref())
    }
}

fn ensure_finite(input: &EstimateInput) -> Result<(), EstimateError> {
    let checks: [(&'static str, f64); 6] = [
        ("total_weight_lbs", input.total_weight_lbs),
        ("total_volume_cuft", input.total_volume_cuft),
        ("distance_miles", input.distance_miles),
        ("estimated_duration_hours", input.estimated_duration_hours),
        ("pickup.parking_distance_feet", input.pickup.parking_distance_feet),
        ("delivery.parking_distance_feet", input.delivery.parking_distance_feet),
    ];
    for (field, value) in checks {
        if !value.is_finite() {
            return Err(EstimateError::NonFiniteInput { field });
        }
    }
    Ok(())
}
