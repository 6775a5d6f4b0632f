//! Input validation. Collects every problem in one pass so callers can
//! show the full list instead of fixing errors one at a time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::pricing::domain::{EstimateInput, ServiceType};

const LOCAL_RADIUS_MILES: f64 = 50.0;

/// Outcome of validating one estimate input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Checks an input against intake requirements. `today` anchors the
/// past-date check so callers control the clock.
pub fn validate_input(input: &EstimateInput, today: NaiveDate) -> ValidationReport {
    let mut errors = Vec::new();

    if input.customer_id.trim().is_empty() {
        errors.push("customer id is required".to_string());
    }

    match input.move_date {
        None => errors.push("move date is required".to_string()),
        Some(date) if date.date_naive() < today => {
            errors.push("move date cannot be in the past".to_string());
        }
        Some(_) => {}
    }

    if input.service_type == ServiceType::Unknown {
        errors.push("service type is required".to_string());
    }

    if input.total_weight_lbs <= 0.0 {
        errors.push("total weight must be greater than zero".to_string());
    }

    if input.total_volume_cuft <= 0.0 {
        errors.push("total volume must be greater than zero".to_string());
    }

    if input.distance_miles < 0.0 {
        errors.push("distance cannot be negative".to_string());
    }

    if input.crew_size < 1 {
        errors.push("crew size must be at least one".to_string());
    }

    if input.estimated_duration_hours <= 0.0 {
        errors.push("estimated duration must be greater than zero".to_string());
    }

    if input.pickup.address.trim().is_empty() {
        errors.push("pickup address is required".to_string());
    }

    if input.delivery.address.trim().is_empty() {
        errors.push("delivery address is required".to_string());
    }

    if input.service_type == ServiceType::LongDistance && input.distance_miles <= LOCAL_RADIUS_MILES
    {
        errors.push("long distance moves must exceed 50 miles".to_string());
    }

    if input.service_type == ServiceType::Local && input.distance_miles > LOCAL_RADIUS_MILES {
        errors.push("local moves cannot exceed 50 miles".to_string());
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}
