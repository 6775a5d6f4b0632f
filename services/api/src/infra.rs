use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::{json, Value};

use relo_pricing::error::AppError;
use relo_pricing::pricing::{
    ActionKind, ConditionOperator, EstimateId, EstimateRepository, EstimateResult,
    LocationHandicap, LogicalOperator, PricingConfig, PricingRule, RepositoryError, RuleAction,
    RuleCategory, RuleCondition, ServiceType, TariffSettings,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEstimateRepository {
    records: Arc<Mutex<HashMap<String, EstimateResult>>>,
}

impl EstimateRepository for InMemoryEstimateRepository {
    fn insert(&self, estimate: EstimateResult) -> Result<EstimateResult, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("estimate store poisoned".to_string()))?;
        if guard.contains_key(&estimate.estimate_id.0) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(estimate.estimate_id.0.clone(), estimate.clone());
        Ok(estimate)
    }

    fn fetch(&self, id: &EstimateId) -> Result<Option<EstimateResult>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("estimate store poisoned".to_string()))?;
        Ok(guard.get(&id.0).cloned())
    }
}

/// The rule set and site-condition charges the service ships with. File
/// based configuration replaces this wholesale via `--rules`.
pub(crate) fn standard_pricing_config() -> PricingConfig {
    let all_services = [
        ServiceType::Local,
        ServiceType::LongDistance,
        ServiceType::Storage,
        ServiceType::PackingOnly,
    ];
    let moving_services = [ServiceType::Local, ServiceType::LongDistance];

    let mut crew = rule(
        "crew_size_adjustment",
        "Crew size adjustment",
        RuleCategory::Adjustment,
        10,
        &[ServiceType::Local, ServiceType::PackingOnly],
    );
    crew.description = "Bills movers beyond the two included in the base rate".to_string();
    crew.conditions = vec![condition("crew_size", ConditionOperator::Gt, json!(2))];
    crew.actions = vec![action(ActionKind::AddFixed, 75.0, "per extra mover per hour")];

    let mut floor = rule(
        "long_distance_minimum",
        "Long distance minimum",
        RuleCategory::Adjustment,
        15,
        &[ServiceType::LongDistance],
    );
    floor.description = "Line-haul jobs never bill below the minimum".to_string();
    floor.actions = vec![action(ActionKind::SetMinimum, 1200.0, "line-haul minimum")];

    let mut fuel = rule(
        "distance_fuel_surcharge",
        "Fuel surcharge",
        RuleCategory::Surcharge,
        20,
        &[ServiceType::LongDistance],
    );
    fuel.description = "Hauls past a hundred miles carry a fuel surcharge".to_string();
    fuel.conditions = vec![condition("distance_miles", ConditionOperator::Gt, json!(100))];
    fuel.actions = vec![action(ActionKind::AddPercentage, 0.05, "of the running price")];

    let mut piano = rule(
        "piano_transport",
        "Piano transport",
        RuleCategory::Surcharge,
        30,
        &moving_services,
    );
    piano.description = "Dedicated rigging and padding for pianos".to_string();
    piano.conditions = vec![condition(
        "special_items.piano_count",
        ConditionOperator::Gte,
        json!(1),
    )];
    piano.actions = vec![action(ActionKind::AddFixed, 250.0, "piano rigging")];

    let mut antiques = rule(
        "antique_handling",
        "Antique handling",
        RuleCategory::Surcharge,
        35,
        &moving_services,
    );
    antiques.description = "Crating and soft-wrap for antiques".to_string();
    antiques.conditions = vec![condition(
        "special_items.antique_count",
        ConditionOperator::Gte,
        json!(1),
    )];
    antiques.actions = vec![action(ActionKind::AddFixed, 150.0, "antique crating")];

    let mut fragile = rule(
        "fragile_items_surcharge",
        "Fragile items surcharge",
        RuleCategory::Surcharge,
        40,
        &all_services,
    );
    fragile.description = "Extra wrap beyond the five fragile items included".to_string();
    fragile.conditions = vec![condition(
        "special_items.fragile_items",
        ConditionOperator::Gt,
        json!(5),
    )];
    fragile.actions = vec![action(ActionKind::AddFixed, 15.0, "per fragile item over five")];

    let mut packing = rule(
        "packing_service_rate",
        "Packing service",
        RuleCategory::Surcharge,
        50,
        &moving_services,
    );
    packing.description = "Full-service packing ahead of the move".to_string();
    packing.conditions = vec![condition(
        "additional_services.packing",
        ConditionOperator::Eq,
        json!(true),
    )];
    packing.actions = vec![action(ActionKind::AddFixed, 180.0, "full-service packing")];

    let mut assembly = rule(
        "assembly_service",
        "Assembly service",
        RuleCategory::Surcharge,
        55,
        &moving_services,
    );
    assembly.description = "Furniture disassembly or reassembly on either end".to_string();
    assembly.conditions = vec![
        or_else(condition(
            "additional_services.disassembly",
            ConditionOperator::Eq,
            json!(true),
        )),
        condition(
            "additional_services.reassembly",
            ConditionOperator::Eq,
            json!(true),
        ),
    ];
    assembly.actions = vec![action(ActionKind::AddFixed, 120.0, "assembly labor")];

    let mut weekend = rule(
        "weekend_surcharge",
        "Weekend surcharge",
        RuleCategory::Seasonal,
        60,
        &all_services,
    );
    weekend.description = "Weekend crews bill a premium".to_string();
    weekend.conditions = vec![condition("is_weekend", ConditionOperator::Eq, json!(true))];
    weekend.actions = vec![action(ActionKind::AddPercentage, 0.10, "weekend premium")];

    let mut holiday = rule(
        "holiday_season_surcharge",
        "Holiday surcharge",
        RuleCategory::Seasonal,
        65,
        &all_services,
    );
    holiday.description = "Observed-holiday crews bill a premium".to_string();
    holiday.conditions = vec![condition("is_holiday", ConditionOperator::Eq, json!(true))];
    holiday.actions = vec![action(ActionKind::AddPercentage, 0.15, "holiday premium")];

    let mut peak = rule(
        "peak_season_surcharge",
        "Peak season surcharge",
        RuleCategory::Seasonal,
        70,
        &all_services,
    );
    peak.description = "Summer peak demand pricing".to_string();
    peak.conditions = vec![condition(
        "is_peak_season",
        ConditionOperator::Eq,
        json!(true),
    )];
    peak.actions = vec![action(ActionKind::AddPercentage, 0.12, "peak season premium")];

    let handicaps = vec![
        fixed_handicap(
            "stairs_pickup",
            "Stairs at pickup",
            condition("pickup.stairs_count", ConditionOperator::Gte, json!(1)),
            75.0,
        ),
        fixed_handicap(
            "stairs_delivery",
            "Stairs at delivery",
            condition("delivery.stairs_count", ConditionOperator::Gte, json!(1)),
            75.0,
        ),
        multiplier_handicap(
            "elevator_unavailable_pickup",
            "No elevator at pickup",
            vec![
                condition("pickup.floor_level", ConditionOperator::Gt, json!(1)),
                condition("pickup.has_elevator", ConditionOperator::Eq, json!(false)),
            ],
            1.05,
        ),
        multiplier_handicap(
            "elevator_unavailable_delivery",
            "No elevator at delivery",
            vec![
                condition("delivery.floor_level", ConditionOperator::Gt, json!(1)),
                condition("delivery.has_elevator", ConditionOperator::Eq, json!(false)),
            ],
            1.05,
        ),
        fixed_handicap(
            "long_carry_pickup",
            "Long carry at pickup",
            condition("pickup.long_carry", ConditionOperator::Eq, json!(true)),
            90.0,
        ),
        fixed_handicap(
            "long_carry_delivery",
            "Long carry at delivery",
            condition("delivery.long_carry", ConditionOperator::Eq, json!(true)),
            90.0,
        ),
        fixed_handicap(
            "parking_distance_pickup",
            "Distant parking at pickup",
            condition(
                "pickup.parking_distance_feet",
                ConditionOperator::Gt,
                json!(100),
            ),
            60.0,
        ),
        fixed_handicap(
            "parking_distance_delivery",
            "Distant parking at delivery",
            condition(
                "delivery.parking_distance_feet",
                ConditionOperator::Gt,
                json!(100),
            ),
            60.0,
        ),
    ];

    PricingConfig {
        rules: vec![
            crew, floor, fuel, piano, antiques, fragile, packing, assembly, weekend, holiday,
            peak,
        ],
        handicaps,
        tariffs: None,
        rules_version: 3,
    }
}

fn rule(
    id: &str,
    name: &str,
    category: RuleCategory,
    priority: i32,
    services: &[ServiceType],
) -> PricingRule {
    PricingRule {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        category,
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

fn condition(field: &str, operator: ConditionOperator, value: Value) -> RuleCondition {
    RuleCondition {
        field: field.to_string(),
        operator,
        value,
        logical_operator: None,
    }
}

fn or_else(mut condition: RuleCondition) -> RuleCondition {
    condition.logical_operator = Some(LogicalOperator::Or);
    condition
}

fn action(kind: ActionKind, amount: f64, description: &str) -> RuleAction {
    RuleAction {
        kind,
        amount,
        description: description.to_string(),
        target_field: None,
    }
}

fn fixed_handicap(
    id: &str,
    name: &str,
    condition: RuleCondition,
    amount: f64,
) -> LocationHandicap {
    LocationHandicap {
        id: id.to_string(),
        name: name.to_string(),
        conditions: vec![condition],
        multiplier: 1.0,
        fixed_amount: Some(amount),
        is_active: true,
    }
}

fn multiplier_handicap(
    id: &str,
    name: &str,
    conditions: Vec<RuleCondition>,
    multiplier: f64,
) -> LocationHandicap {
    LocationHandicap {
        id: id.to_string(),
        name: name.to_string(),
        conditions,
        multiplier,
        fixed_amount: None,
        is_active: true,
    }
}

/// Builds the runtime pricing configuration from CLI arguments: a rules
/// file replaces the standard set, a tariffs file replaces its tariffs.
pub(crate) fn resolve_pricing_config(
    rules: Option<PathBuf>,
    tariffs: Option<PathBuf>,
) -> Result<PricingConfig, AppError> {
    let mut config = match rules {
        Some(path) => load_pricing_config(&path)?,
        None => standard_pricing_config(),
    };
    if let Some(path) = tariffs {
        config.tariffs = Some(load_tariffs(&path)?);
    }
    Ok(config)
}

pub(crate) fn load_pricing_config(path: &Path) -> Result<PricingConfig, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn load_tariffs(path: &Path) -> Result<TariffSettings, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
