//! Tariff tables: the preferred pricing source when present. Every lookup
//! here has a legacy formula fallback in the resolvers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Day-of-week key for rate tables. Ordered Monday first to keep serialized
/// tables stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Mon => DayOfWeek::Monday,
            chrono::Weekday::Tue => DayOfWeek::Tuesday,
            chrono::Weekday::Wed => DayOfWeek::Wednesday,
            chrono::Weekday::Thu => DayOfWeek::Thursday,
            chrono::Weekday::Fri => DayOfWeek::Friday,
            chrono::Weekday::Sat => DayOfWeek::Saturday,
            chrono::Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

/// Hourly rate and billing floor for one crew size on one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayRate {
    pub hourly_rate: f64,
    #[serde(default)]
    pub minimum_hours: f64,
}

/// Rates keyed by crew size, then weekday.
pub type CrewRateTable = BTreeMap<u32, BTreeMap<DayOfWeek, DayRate>>;

/// Per-pound rate for one weight band. The band is inclusive of
/// `min_weight_lbs` and exclusive of `max_weight_lbs`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceRateBracket {
    pub min_weight_lbs: f64,
    pub max_weight_lbs: f64,
    pub rate_per_lb: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Site-condition classes a tariff row can price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandicapCategory {
    Stairs,
    Elevator,
    LongCarry,
}

/// Percentage-of-price charge for one handicap category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandicapTariff {
    pub name: String,
    pub category: HandicapCategory,
    pub percentage: f64,
    #[serde(default)]
    pub per_unit: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Volume threshold selecting a crew size. Rows are scanned in order and
/// the first row whose `min_cubic_feet` exceeds the job volume wins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrewThreshold {
    pub min_cubic_feet: f64,
    pub crew_size: u32,
}

/// Volume threshold selecting a truck count. Same scan as crew thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruckThreshold {
    pub min_cubic_feet: f64,
    pub truck_count: u32,
}

/// Sizing lookup tables for crew, truck, and labor-hour recommendations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoPricingTables {
    pub crew_thresholds: Vec<CrewThreshold>,
    pub truck_thresholds: Vec<TruckThreshold>,
    pub crew_capacities: BTreeMap<u32, f64>,
    pub max_hours_per_job: Option<f64>,
}

/// Complete tariff configuration. Any section may be empty; resolvers fall
/// back to legacy formulas per lookup, not per settings object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffSettings {
    pub hourly_rates: CrewRateTable,
    pub packing_rates: CrewRateTable,
    pub distance_rates: Vec<DistanceRateBracket>,
    pub handicaps: Vec<HandicapTariff>,
    pub auto_pricing: Option<AutoPricingTables>,
}

fn default_true() -> bool {
    true
}
