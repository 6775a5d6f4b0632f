//! Base price resolution. Tariff tables are consulted first; when a
//! lookup finds no usable entry the resolver falls back to the legacy
//! flat-rate formulas and keeps going.

use chrono::{DateTime, Datelike, Utc};

use crate::pricing::domain::{round_to_cents, EstimateInput, ServiceType};
use crate::pricing::estimator::EstimateError;
use crate::pricing::tariffs::{CrewRateTable, DayOfWeek, DayRate, TariffSettings};

const LOCAL_BASE_HOURLY: f64 = 150.0;
const LOCAL_EXTRA_CREW_HOURLY: f64 = 75.0;
const LONG_DISTANCE_RATE_PER_LB: f64 = 1.25;
const STORAGE_RATE_PER_CUFT: f64 = 8.0;
const PACKING_HOURLY: f64 = 85.0;
const INCLUDED_CREW: u32 = 2;

/// Which pricing source produced the base amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    Tariff,
    Legacy,
}

/// Base price before any rules or handicaps apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedBasePrice {
    pub amount: f64,
    pub via: ResolutionPath,
}

/// Resolves the base price for the input's service line.
///
/// Storage always uses the legacy volume rate; no tariff table covers it.
pub fn resolve_base_price(
    input: &EstimateInput,
    tariffs: Option<&TariffSettings>,
) -> Result<ResolvedBasePrice, EstimateError> {
    match input.service_type {
        ServiceType::Local => Ok(resolve_local(input, tariffs)),
        ServiceType::LongDistance => Ok(resolve_long_distance(input, tariffs)),
        ServiceType::Storage => Ok(legacy_price(input.total_volume_cuft * STORAGE_RATE_PER_CUFT)),
        ServiceType::PackingOnly => Ok(resolve_packing(input, tariffs)),
        ServiceType::Unknown => Err(EstimateError::UnknownService),
    }
}

fn resolve_local(input: &EstimateInput, tariffs: Option<&TariffSettings>) -> ResolvedBasePrice {
    if let Some(tariffs) = tariffs {
        if let Some(rate) = day_rate(&tariffs.hourly_rates, input.crew_size, input.move_date) {
            let billable_hours = input.estimated_duration_hours.max(rate.minimum_hours);
            return tariff_price(rate.hourly_rate * billable_hours);
        }
        tracing::warn!(
            crew_size = input.crew_size,
            "no hourly tariff for this crew and day, using legacy local formula"
        );
    }

    let extra_crew = input.crew_size.saturating_sub(INCLUDED_CREW);
    let hourly = LOCAL_BASE_HOURLY + f64::from(extra_crew) * LOCAL_EXTRA_CREW_HOURLY;
    legacy_price(hourly * input.estimated_duration_hours)
}

fn resolve_long_distance(
    input: &EstimateInput,
    tariffs: Option<&TariffSettings>,
) -> ResolvedBasePrice {
    if let Some(tariffs) = tariffs {
        let bracket = tariffs.distance_rates.iter().find(|bracket| {
            bracket.is_active
                && input.total_weight_lbs >= bracket.min_weight_lbs
                && input.total_weight_lbs < bracket.max_weight_lbs
        });
        if let Some(bracket) = bracket {
            return tariff_price(bracket.rate_per_lb * input.total_weight_lbs);
        }
        tracing::warn!(
            weight_lbs = input.total_weight_lbs,
            "no active distance bracket covers this weight, using legacy per-pound rate"
        );
    }

    legacy_price(input.total_weight_lbs * LONG_DISTANCE_RATE_PER_LB)
}

fn resolve_packing(input: &EstimateInput, tariffs: Option<&TariffSettings>) -> ResolvedBasePrice {
    if let Some(tariffs) = tariffs {
        if let Some(rate) = day_rate(&tariffs.packing_rates, input.crew_size, input.move_date) {
            // Packing bills actual duration; minimum hours apply to local moves only.
            return tariff_price(rate.hourly_rate * input.estimated_duration_hours);
        }
        tracing::warn!(
            crew_size = input.crew_size,
            "no packing tariff for this crew and day, using legacy packing rate"
        );
    }

    legacy_price(PACKING_HOURLY * input.estimated_duration_hours)
}

fn day_rate(
    table: &CrewRateTable,
    crew_size: u32,
    move_date: Option<DateTime<Utc>>,
) -> Option<DayRate> {
    let day = DayOfWeek::from(move_date?.date_naive().weekday());
    table.get(&crew_size)?.get(&day).copied()
}

fn tariff_price(amount: f64) -> ResolvedBasePrice {
    ResolvedBasePrice {
        amount: round_to_cents(amount),
        via: ResolutionPath::Tariff,
    }
}

fn legacy_price(amount: f64) -> ResolvedBasePrice {
    ResolvedBasePrice {
        amount: round_to_cents(amount),
        via: ResolutionPath::Legacy,
    }
}
