use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::pricing::domain::{
    AdditionalServices, EstimateId, EstimateInput, EstimateResult, LocationDetails, ServiceType,
    SpecialItems,
};
use crate::pricing::estimator::{EstimateIdSource, PriceEstimator, PricingConfig};
use crate::pricing::repository::{EstimateRepository, RepositoryError};
use crate::pricing::rules::{
    ActionKind, ConditionOperator, LocationHandicap, PricingRule, RuleAction, RuleCategory,
    RuleCondition,
};
use crate::pricing::service::QuoteService;
use crate::pricing::tariffs::{CrewRateTable, DayOfWeek, DayRate, TariffSettings};

pub(super) fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date")
}

pub(super) fn location(address: &str) -> LocationDetails {
    LocationDetails {
        address: address.to_string(),
        ..LocationDetails::default()
    }
}

/// Two-person local move on Saturday 2026-10-03, four billed hours.
pub(super) fn sample_input() -> EstimateInput {
    EstimateInput {
        customer_id: "cust-042".to_string(),
        service_type: ServiceType::Local,
        move_date: Some(utc(2026, 10, 3)),
        total_weight_lbs: 4000.0,
        total_volume_cuft: 600.0,
        distance_miles: 12.0,
        crew_size: 2,
        estimated_duration_hours: 4.0,
        pickup: location("14 Birch Street"),
        delivery: location("88 Lakeview Drive"),
        special_items: SpecialItems::default(),
        additional_services: AdditionalServices::default(),
        is_weekend: false,
        is_holiday: false,
        is_peak_season: false,
        requires_specialty_crew: false,
    }
}

/// Same shape as [`sample_input`] but dated relative to the wall clock,
/// for tests that go through handlers anchored to the real today.
pub(super) fn upcoming_input() -> EstimateInput {
    let mut input = sample_input();
    input.move_date = Some(Utc::now() + chrono::Duration::days(30));
    input
}

pub(super) fn rule(id: &str, priority: i32, services: &[ServiceType]) -> PricingRule {
    PricingRule {
        id: id.to_string(),
        name: id.replace('_', " "),
        description: String::new(),
        category: RuleCategory::Surcharge,
        priority,
        conditions: Vec::new(),
        actions: Vec::new(),
        is_active: true,
        effective_from: None,
        effective_to: None,
        applicable_services: services.to_vec(),
        version: 1,
        tags: Vec::new(),
    }
}

pub(super) fn condition(field: &str, operator: ConditionOperator, value: Value) -> RuleCondition {
    RuleCondition {
        field: field.to_string(),
        operator,
        value,
        logical_operator: None,
    }
}

pub(super) fn action(kind: ActionKind, amount: f64) -> RuleAction {
    RuleAction {
        kind,
        amount,
        description: String::new(),
        target_field: None,
    }
}

pub(super) fn handicap(id: &str, conditions: Vec<RuleCondition>) -> LocationHandicap {
    LocationHandicap {
        id: id.to_string(),
        name: id.replace('_', " "),
        conditions,
        multiplier: 1.0,
        fixed_amount: None,
        is_active: true,
    }
}

pub(super) fn crew_day_rates(crew_size: u32, day: DayOfWeek, rate: DayRate) -> CrewRateTable {
    let mut days = BTreeMap::new();
    days.insert(day, rate);
    let mut table = BTreeMap::new();
    table.insert(crew_size, days);
    table
}

pub(super) fn hourly_tariffs(crew_size: u32, day: DayOfWeek, rate: DayRate) -> TariffSettings {
    TariffSettings {
        hourly_rates: crew_day_rates(crew_size, day, rate),
        ..TariffSettings::default()
    }
}

/// Ten percent weekend surcharge plus a fixed stairs charge at pickup.
pub(super) fn test_config() -> PricingConfig {
    let all_services = [
        ServiceType::Local,
        ServiceType::LongDistance,
        ServiceType::Storage,
        ServiceType::PackingOnly,
    ];

    let mut weekend = rule("weekend_surcharge", 60, &all_services);
    weekend.conditions = vec![condition(
        "is_weekend",
        ConditionOperator::Eq,
        Value::Bool(true),
    )];
    weekend.actions = vec![action(ActionKind::AddPercentage, 0.10)];

    let mut stairs = handicap(
        "stairs_pickup",
        vec![condition(
            "pickup.stairs_count",
            ConditionOperator::Gte,
            Value::from(1),
        )],
    );
    stairs.fixed_amount = Some(75.0);

    PricingConfig {
        rules: vec![weekend],
        handicaps: vec![stairs],
        tariffs: None,
        rules_version: 3,
    }
}

pub(super) fn estimator(config: PricingConfig) -> PriceEstimator {
    PriceEstimator::new(config).with_id_source(Arc::new(SequenceIds::default()))
}

pub(super) fn build_service() -> (Arc<QuoteService<MemoryEstimates>>, Arc<MemoryEstimates>) {
    let repository = Arc::new(MemoryEstimates::default());
    let service = QuoteService::new(repository.clone(), estimator(test_config()));
    (Arc::new(service), repository)
}

#[derive(Default)]
pub(super) struct SequenceIds {
    next: AtomicU64,
}

impl EstimateIdSource for SequenceIds {
    fn next_estimate_id(&self) -> EstimateId {
        let id = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        EstimateId(format!("est-{id:06}"))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryEstimates {
    records: Arc<Mutex<HashMap<String, EstimateResult>>>,
}

impl MemoryEstimates {
    pub(super) fn stored(&self) -> Vec<EstimateResult> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .values()
            .cloned()
            .collect()
    }
}

impl EstimateRepository for MemoryEstimates {
    fn insert(&self, estimate: EstimateResult) -> Result<EstimateResult, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&estimate.estimate_id.0) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(estimate.estimate_id.0.clone(), estimate.clone());
        Ok(estimate)
    }

    fn fetch(&self, id: &EstimateId) -> Result<Option<EstimateResult>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }
}

pub(super) struct ConflictEstimates;

impl EstimateRepository for ConflictEstimates {
    fn insert(&self, _estimate: EstimateResult) -> Result<EstimateResult, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &EstimateId) -> Result<Option<EstimateResult>, RepositoryError> {
        Ok(None)
    }
}

pub(super) struct UnavailableEstimates;

impl EstimateRepository for UnavailableEstimates {
    fn insert(&self, _estimate: EstimateResult) -> Result<EstimateResult, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &EstimateId) -> Result<Option<EstimateResult>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
