//! Field addressing for rule conditions. Conditions reference input fields
//! by dotted path strings; this module closes that surface into an enum so
//! every reachable field is known at compile time.

use crate::pricing::domain::EstimateInput;

/// Scalar view of one input field after resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Field is absent for this input (unset date, unknown service).
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric coercion matching loose dynamic-language comparison rules:
    /// booleans become 0/1, text parses after trimming with empty text as
    /// zero, and anything unparseable becomes NaN.
    pub fn as_number(&self) -> f64 {
        match self {
            FieldValue::Missing => f64::NAN,
            FieldValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => coerce_text(s),
        }
    }

    /// String rendering used by the regex operator. Missing fields have no
    /// text form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Missing => None,
            FieldValue::Bool(b) => Some(if *b { "true" } else { "false" }.to_string()),
            FieldValue::Number(n) => Some(format!("{n}")),
            FieldValue::Text(s) => Some(s.clone()),
        }
    }
}

pub(crate) fn coerce_text(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        0.0
    } else {
        trimmed.parse().unwrap_or(f64::NAN)
    }
}

/// Fields on either end of the move that conditions can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationField {
    Address,
    FloorLevel,
    HasElevator,
    LongCarry,
    ParkingDistanceFeet,
    AccessDifficulty,
    StairsCount,
    NarrowHallways,
}

/// Special-item counters conditions can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialItemField {
    PianoCount,
    AntiqueCount,
    ArtworkCount,
    FragileItems,
    ValuableItems,
}

/// Add-on flags conditions can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdditionalServiceField {
    Packing,
    Unpacking,
    Disassembly,
    Reassembly,
    Storage,
    DebrisRemoval,
}

/// Every input field a condition may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    CustomerId,
    ServiceType,
    MoveDate,
    TotalWeightLbs,
    TotalVolumeCuft,
    DistanceMiles,
    CrewSize,
    EstimatedDurationHours,
    IsWeekend,
    IsHoliday,
    IsPeakSeason,
    RequiresSpecialtyCrew,
    Pickup(LocationField),
    Delivery(LocationField),
    SpecialItems(SpecialItemField),
    AdditionalServices(AdditionalServiceField),
}

impl FieldPath {
    /// Parses a dotted path string. Unknown paths return `None`, which
    /// evaluators treat as a missing field rather than an error.
    pub fn parse(path: &str) -> Option<FieldPath> {
        let mut parts = path.splitn(2, '.');
        let head = parts.next()?;
        let rest = parts.next();

        match (head, rest) {
            ("customer_id", None) => Some(FieldPath::CustomerId),
            ("service_type", None) => Some(FieldPath::ServiceType),
            ("move_date", None) => Some(FieldPath::MoveDate),
            ("total_weight_lbs", None) => Some(FieldPath::TotalWeightLbs),
            ("total_volume_cuft", None) => Some(FieldPath::TotalVolumeCuft),
            ("distance_miles", None) => Some(FieldPath::DistanceMiles),
            ("crew_size", None) => Some(FieldPath::CrewSize),
            ("estimated_duration_hours", None) => Some(FieldPath::EstimatedDurationHours),
            ("is_weekend", None) => Some(FieldPath::IsWeekend),
            ("is_holiday", None) => Some(FieldPath::IsHoliday),
            ("is_peak_season", None) => Some(FieldPath::IsPeakSeason),
            ("requires_specialty_crew", None) => Some(FieldPath::RequiresSpecialtyCrew),
            ("pickup", Some(field)) => location_field(field).map(FieldPath::Pickup),
            ("delivery", Some(field)) => location_field(field).map(FieldPath::Delivery),
            ("special_items", Some(field)) => special_item_field(field).map(FieldPath::SpecialItems),
            ("additional_services", Some(field)) => {
                additional_service_field(field).map(FieldPath::AdditionalServices)
            }
            _ => None,
        }
    }

    /// Reads the addressed field off the input.
    pub fn resolve(self, input: &EstimateInput) -> FieldValue {
        match self {
            FieldPath::CustomerId => FieldValue::Text(input.customer_id.clone()),
            FieldPath::ServiceType => {
                if input.service_type == crate::pricing::domain::ServiceType::Unknown {
                    FieldValue::Missing
                } else {
                    FieldValue::Text(input.service_type.label().to_string())
                }
            }
            FieldPath::MoveDate => match input.move_date {
                Some(date) => FieldValue::Text(date.to_rfc3339()),
                None => FieldValue::Missing,
            },
            FieldPath::TotalWeightLbs => FieldValue::Number(input.total_weight_lbs),
            FieldPath::TotalVolumeCuft => FieldValue::Number(input.total_volume_cuft),
            FieldPath::DistanceMiles => FieldValue::Number(input.distance_miles),
            FieldPath::CrewSize => FieldValue::Number(f64::from(input.crew_size)),
            FieldPath::EstimatedDurationHours => {
                FieldValue::Number(input.estimated_duration_hours)
            }
            FieldPath::IsWeekend => FieldValue::Bool(input.is_weekend),
            FieldPath::IsHoliday => FieldValue::Bool(input.is_holiday),
            FieldPath::IsPeakSeason => FieldValue::Bool(input.is_peak_season),
            FieldPath::RequiresSpecialtyCrew => FieldValue::Bool(input.requires_specialty_crew),
            FieldPath::Pickup(field) => resolve_location(&input.pickup, field),
            FieldPath::Delivery(field) => resolve_location(&input.delivery, field),
            FieldPath::SpecialItems(field) => {
                let items = &input.special_items;
                let count = match field {
                    SpecialItemField::PianoCount => items.piano_count,
                    SpecialItemField::AntiqueCount => items.antique_count,
                    SpecialItemField::ArtworkCount => items.artwork_count,
                    SpecialItemField::FragileItems => items.fragile_items,
                    SpecialItemField::ValuableItems => items.valuable_items,
                };
                FieldValue::Number(f64::from(count))
            }
            FieldPath::AdditionalServices(field) => {
                let services = &input.additional_services;
                let flag = match field {
                    AdditionalServiceField::Packing => services.packing,
                    AdditionalServiceField::Unpacking => services.unpacking,
                    AdditionalServiceField::Disassembly => services.disassembly,
                    AdditionalServiceField::Reassembly => services.reassembly,
                    AdditionalServiceField::Storage => services.storage,
                    AdditionalServiceField::DebrisRemoval => services.debris_removal,
                };
                FieldValue::Bool(flag)
            }
        }
    }
}

fn location_field(name: &str) -> Option<LocationField> {
    match name {
        "address" => Some(LocationField::Address),
        "floor_level" => Some(LocationField::FloorLevel),
        "has_elevator" => Some(LocationField::HasElevator),
        "long_carry" => Some(LocationField::LongCarry),
        "parking_distance_feet" => Some(LocationField::ParkingDistanceFeet),
        "access_difficulty" => Some(LocationField::AccessDifficulty),
        "stairs_count" => Some(LocationField::StairsCount),
        "narrow_hallways" => Some(LocationField::NarrowHallways),
        _ => None,
    }
}

fn special_item_field(name: &str) -> Option<SpecialItemField> {
    match name {
        "piano_count" => Some(SpecialItemField::PianoCount),
        "antique_count" => Some(SpecialItemField::AntiqueCount),
        "artwork_count" => Some(SpecialItemField::ArtworkCount),
        "fragile_items" => Some(SpecialItemField::FragileItems),
        "valuable_items" => Some(SpecialItemField::ValuableItems),
        _ => None,
    }
}

fn additional_service_field(name: &str) -> Option<AdditionalServiceField> {
    match name {
        "packing" => Some(AdditionalServiceField::Packing),
        "unpacking" => Some(AdditionalServiceField::Unpacking),
        "disassembly" => Some(AdditionalServiceField::Disassembly),
        "reassembly" => Some(AdditionalServiceField::Reassembly),
        "storage" => Some(AdditionalServiceField::Storage),
        "debris_removal" => Some(AdditionalServiceField::DebrisRemoval),
        _ => None,
    }
}

fn resolve_location(location: &crate::pricing::domain::LocationDetails, field: LocationField) -> FieldValue {
    match field {
        LocationField::Address => FieldValue::Text(location.address.clone()),
        LocationField::FloorLevel => FieldValue::Number(f64::from(location.floor_level)),
        LocationField::HasElevator => FieldValue::Bool(location.has_elevator),
        LocationField::LongCarry => FieldValue::Bool(location.long_carry),
        LocationField::ParkingDistanceFeet => FieldValue::Number(location.parking_distance_feet),
        LocationField::AccessDifficulty => {
            FieldValue::Text(location.access_difficulty.label().to_string())
        }
        LocationField::StairsCount => FieldValue::Number(f64::from(location.stairs_count)),
        LocationField::NarrowHallways => FieldValue::Bool(location.narrow_hallways),
    }
}
