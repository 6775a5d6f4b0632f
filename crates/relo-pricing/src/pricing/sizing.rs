//! Crew, truck, and labor-hour sizing from job volume. Threshold tables
//! come from the tariff configuration when present, with built-in tiers
//! as the fallback.

use serde::{Deserialize, Serialize};

use crate::pricing::tariffs::{AutoPricingTables, TariffSettings};

const SMALL_JOB_CUFT: f64 = 800.0;
const MEDIUM_JOB_CUFT: f64 = 1500.0;
const TRUCK_CAPACITY_CUFT: f64 = 1500.0;
const DEFAULT_CUFT_PER_CREW_HOUR: f64 = 50.0;

/// Suggested staffing for a job of a given volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingRecommendation {
    pub crew_size: u32,
    pub truck_count: u32,
    pub estimated_hours: f64,
}

/// Builds a full recommendation, deriving the crew size from volume when
/// the caller does not fix one.
pub fn recommend(
    cubic_feet: f64,
    crew_size: Option<u32>,
    tariffs: Option<&TariffSettings>,
) -> SizingRecommendation {
    let crew_size = crew_size.unwrap_or_else(|| required_crew(cubic_feet, tariffs));
    SizingRecommendation {
        crew_size,
        truck_count: required_trucks(cubic_feet, tariffs),
        estimated_hours: estimated_labor_hours(cubic_feet, crew_size.max(1), tariffs),
    }
}

/// Crew size for a job volume. Threshold rows are scanned in order and
/// the first row whose `min_cubic_feet` exceeds the volume wins.
pub fn required_crew(cubic_feet: f64, tariffs: Option<&TariffSettings>) -> u32 {
    if let Some(tables) = auto_pricing(tariffs) {
        for row in &tables.crew_thresholds {
            if row.min_cubic_feet > cubic_feet {
                return row.crew_size;
            }
        }
    }
    if cubic_feet < SMALL_JOB_CUFT {
        2
    } else if cubic_feet < MEDIUM_JOB_CUFT {
        3
    } else {
        4
    }
}

/// Truck count for a job volume, never below one.
pub fn required_trucks(cubic_feet: f64, tariffs: Option<&TariffSettings>) -> u32 {
    if let Some(tables) = auto_pricing(tariffs) {
        for row in &tables.truck_thresholds {
            if row.min_cubic_feet > cubic_feet {
                return row.truck_count;
            }
        }
    }
    ((cubic_feet / TRUCK_CAPACITY_CUFT).ceil() as u32).max(1)
}

/// Labor hours for a crew of the given size. Configured crew capacities
/// give fractional hours capped at `max_hours_per_job`; the fallback
/// formula rounds whole hours up.
pub fn estimated_labor_hours(
    cubic_feet: f64,
    crew_size: u32,
    tariffs: Option<&TariffSettings>,
) -> f64 {
    if let Some(tables) = auto_pricing(tariffs) {
        if let Some(capacity) = tables.crew_capacities.get(&crew_size) {
            let hours = cubic_feet / *capacity;
            return match tables.max_hours_per_job {
                Some(max_hours) => hours.min(max_hours),
                None => hours,
            };
        }
    }
    (cubic_feet / (DEFAULT_CUFT_PER_CREW_HOUR * f64::from(crew_size))).ceil()
}

fn auto_pricing(tariffs: Option<&TariffSettings>) -> Option<&AutoPricingTables> {
    tariffs.and_then(|settings| settings.auto_pricing.as_ref())
}
