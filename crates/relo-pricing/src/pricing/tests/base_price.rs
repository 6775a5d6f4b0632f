use super::common::*;
use crate::pricing::base_price::{resolve_base_price, ResolutionPath};
use crate::pricing::domain::ServiceType;
use crate::pricing::estimator::EstimateError;
use crate::pricing::tariffs::{DayOfWeek, DayRate, DistanceRateBracket, TariffSettings};

#[test]
fn local_legacy_rate_scales_with_extra_crew() {
    let mut input = sample_input();
    let resolved = resolve_base_price(&input, None).expect("local resolves");
    assert_eq!(resolved.amount, 600.0);
    assert_eq!(resolved.via, ResolutionPath::Legacy);

    input.crew_size = 4;
    input.estimated_duration_hours = 8.0;
    let resolved = resolve_base_price(&input, None).expect("local resolves");
    assert_eq!(resolved.amount, 2400.0);
}

#[test]
fn local_tariff_enforces_minimum_hours() {
    let tariffs = hourly_tariffs(
        2,
        DayOfWeek::Saturday,
        DayRate {
            hourly_rate: 180.0,
            minimum_hours: 4.0,
        },
    );

    let mut input = sample_input();
    input.estimated_duration_hours = 3.0;
    let resolved = resolve_base_price(&input, Some(&tariffs)).expect("local resolves");
    assert_eq!(resolved.amount, 720.0);
    assert_eq!(resolved.via, ResolutionPath::Tariff);

    input.estimated_duration_hours = 5.0;
    let resolved = resolve_base_price(&input, Some(&tariffs)).expect("local resolves");
    assert_eq!(resolved.amount, 900.0);
}

#[test]
fn local_falls_back_when_crew_has_no_tariff_row() {
    let tariffs = hourly_tariffs(
        3,
        DayOfWeek::Saturday,
        DayRate {
            hourly_rate: 220.0,
            minimum_hours: 4.0,
        },
    );

    let resolved = resolve_base_price(&sample_input(), Some(&tariffs)).expect("local resolves");
    assert_eq!(resolved.amount, 600.0);
    assert_eq!(resolved.via, ResolutionPath::Legacy);
}

#[test]
fn local_falls_back_without_a_move_date() {
    let tariffs = hourly_tariffs(
        2,
        DayOfWeek::Saturday,
        DayRate {
            hourly_rate: 180.0,
            minimum_hours: 4.0,
        },
    );

    let mut input = sample_input();
    input.move_date = None;
    let resolved = resolve_base_price(&input, Some(&tariffs)).expect("local resolves");
    assert_eq!(resolved.amount, 600.0);
    assert_eq!(resolved.via, ResolutionPath::Legacy);
}

#[test]
fn long_distance_picks_the_first_active_bracket() {
    let tariffs = TariffSettings {
        distance_rates: vec![
            DistanceRateBracket {
                min_weight_lbs: 0.0,
                max_weight_lbs: 5000.0,
                rate_per_lb: 1.5,
                is_active: false,
            },
            DistanceRateBracket {
                min_weight_lbs: 0.0,
                max_weight_lbs: 5000.0,
                rate_per_lb: 1.4,
                is_active: true,
            },
            DistanceRateBracket {
                min_weight_lbs: 5000.0,
                max_weight_lbs: 20000.0,
                rate_per_lb: 1.1,
                is_active: true,
            },
        ],
        ..TariffSettings::default()
    };

    let mut input = sample_input();
    input.service_type = ServiceType::LongDistance;
    input.distance_miles = 400.0;

    let resolved = resolve_base_price(&input, Some(&tariffs)).expect("resolves");
    assert_eq!(resolved.amount, 5600.0);
    assert_eq!(resolved.via, ResolutionPath::Tariff);

    // Lower bound inclusive, upper bound exclusive.
    input.total_weight_lbs = 5000.0;
    let resolved = resolve_base_price(&input, Some(&tariffs)).expect("resolves");
    assert_eq!(resolved.amount, 5500.0);

    input.total_weight_lbs = 20000.0;
    let resolved = resolve_base_price(&input, Some(&tariffs)).expect("resolves");
    assert_eq!(resolved.amount, 25000.0);
    assert_eq!(resolved.via, ResolutionPath::Legacy);
}

#[test]
fn long_distance_legacy_per_pound_rate() {
    let mut input = sample_input();
    input.service_type = ServiceType::LongDistance;
    input.distance_miles = 400.0;
    input.total_weight_lbs = 12500.0;

    let resolved = resolve_base_price(&input, None).expect("resolves");
    assert_eq!(resolved.amount, 15625.0);
    assert_eq!(resolved.via, ResolutionPath::Legacy);
}

#[test]
fn storage_always_uses_the_volume_rate() {
    let tariffs = hourly_tariffs(
        2,
        DayOfWeek::Saturday,
        DayRate {
            hourly_rate: 180.0,
            minimum_hours: 4.0,
        },
    );

    let mut input = sample_input();
    input.service_type = ServiceType::Storage;

    let resolved = resolve_base_price(&input, Some(&tariffs)).expect("resolves");
    assert_eq!(resolved.amount, 4800.0);
    assert_eq!(resolved.via, ResolutionPath::Legacy);
}

#[test]
fn packing_bills_actual_hours_without_a_floor() {
    let tariffs = TariffSettings {
        packing_rates: crew_day_rates(
            2,
            DayOfWeek::Saturday,
            DayRate {
                hourly_rate: 95.0,
                minimum_hours: 4.0,
            },
        ),
        ..TariffSettings::default()
    };

    let mut input = sample_input();
    input.service_type = ServiceType::PackingOnly;
    input.estimated_duration_hours = 3.0;

    let resolved = resolve_base_price(&input, Some(&tariffs)).expect("resolves");
    assert_eq!(resolved.amount, 285.0);
    assert_eq!(resolved.via, ResolutionPath::Tariff);

    let resolved = resolve_base_price(&input, None).expect("resolves");
    assert_eq!(resolved.amount, 255.0);
    assert_eq!(resolved.via, ResolutionPath::Legacy);
}

#[test]
fn unknown_service_is_rejected() {
    let mut input = sample_input();
    input.service_type = ServiceType::Unknown;

    match resolve_base_price(&input, None) {
        Err(EstimateError::UnknownService) => {}
        other => panic!("expected unknown service error, got {other:?}"),
    }
}
