use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for generated estimates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EstimateId(pub String);

/// Service lines the engine can price.
///
/// Absent or unrecognized labels land on `Unknown` so the validator can
/// report them instead of the deserializer rejecting the whole payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Local,
    LongDistance,
    Storage,
    PackingOnly,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ServiceType {
    pub const fn label(self) -> &'static str {
        match self {
            ServiceType::Local => "local",
            ServiceType::LongDistance => "long_distance",
            ServiceType::Storage => "storage",
            ServiceType::PackingOnly => "packing_only",
            ServiceType::Unknown => "unknown",
        }
    }
}

/// Surveyed difficulty of moving goods through a location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDifficulty {
    #[default]
    Easy,
    Moderate,
    Difficult,
    Extreme,
}

impl AccessDifficulty {
    pub const fn label(self) -> &'static str {
        match self {
            AccessDifficulty::Easy => "easy",
            AccessDifficulty::Moderate => "moderate",
            AccessDifficulty::Difficult => "difficult",
            AccessDifficulty::Extreme => "extreme",
        }
    }
}

/// Physical access description for one end of the move.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationDetails {
    pub address: String,
    pub floor_level: u32,
    pub has_elevator: bool,
    pub long_carry: bool,
    pub parking_distance_feet: f64,
    pub access_difficulty: AccessDifficulty,
    pub stairs_count: u32,
    pub narrow_hallways: bool,
}

/// Counts of items needing dedicated handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialItems {
    pub piano_count: u32,
    pub antique_count: u32,
    pub artwork_count: u32,
    pub fragile_items: u32,
    pub valuable_items: u32,
}

/// Optional service add-ons requested with the move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionalServices {
    pub packing: bool,
    pub unpacking: bool,
    pub disassembly: bool,
    pub reassembly: bool,
    pub storage: bool,
    pub debris_removal: bool,
}

/// Job intake snapshot the engine prices. Immutable per call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateInput {
    pub customer_id: String,
    pub service_type: ServiceType,
    pub move_date: Option<DateTime<Utc>>,
    pub total_weight_lbs: f64,
    pub total_volume_cuft: f64,
    pub distance_miles: f64,
    pub crew_size: u32,
    pub estimated_duration_hours: f64,
    pub pickup: LocationDetails,
    pub delivery: LocationDetails,
    pub special_items: SpecialItems,
    pub additional_services: AdditionalServices,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub is_peak_season: bool,
    pub requires_specialty_crew: bool,
}

/// Which end of the move a handicap charges for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandicapSide {
    Pickup,
    Delivery,
    Both,
}

impl HandicapSide {
    pub const fn label(self) -> &'static str {
        match self {
            HandicapSide::Pickup => "pickup",
            HandicapSide::Delivery => "delivery",
            HandicapSide::Both => "both",
        }
    }
}

/// One rule's contribution to the final price, with its audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedRule {
    pub rule_id: String,
    pub name: String,
    pub description: String,
    pub price_impact: f64,
    pub calculation: String,
}

/// One location handicap's contribution to the final price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedHandicap {
    pub handicap_id: String,
    pub name: String,
    pub side: HandicapSide,
    pub impact: f64,
    pub calculation: String,
}

/// Display buckets summing subsets of the applied impacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base_labor: f64,
    pub materials: f64,
    pub transportation: f64,
    pub location_handicaps: f64,
    pub special_services: f64,
    pub seasonal_adjustment: f64,
    pub subtotal: f64,
    pub taxes: f64,
    pub total: f64,
}

/// Provenance attached to every generated estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateMetadata {
    pub generated_at: DateTime<Utc>,
    pub calculated_by: String,
    pub rules_version: u32,
    pub deterministic: bool,
    pub input_hash: String,
}

/// Fully itemized quote produced by one `calculate_estimate` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateResult {
    pub estimate_id: EstimateId,
    pub input: EstimateInput,
    pub base_price: f64,
    pub applied_rules: Vec<AppliedRule>,
    pub applied_location_handicaps: Vec<AppliedHandicap>,
    pub final_price: f64,
    pub breakdown: PriceBreakdown,
    pub metadata: EstimateMetadata,
}

/// Money rounding used everywhere a price or delta is surfaced.
pub(crate) fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
