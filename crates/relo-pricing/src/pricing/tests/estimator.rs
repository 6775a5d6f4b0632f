use serde_json::json;

use super::common::*;
use crate::pricing::domain::ServiceType;
use crate::pricing::estimator::{EstimateError, PricingConfig};
use crate::pricing::hashing::HashAlgorithm;
use crate::pricing::rule_applier::CREW_SIZE_ADJUSTMENT_RULE;
use crate::pricing::rules::{ActionKind, ConditionOperator, LocationHandicap, PricingRule};

const LOCAL: &[ServiceType] = &[ServiceType::Local];

fn config_with(rules: Vec<PricingRule>, handicaps: Vec<LocationHandicap>) -> PricingConfig {
    PricingConfig {
        rules,
        handicaps,
        tariffs: None,
        rules_version: 3,
    }
}

#[test]
fn construction_filters_inactive_and_orders_by_priority() {
    let mut dormant = rule("dormant_rule", 5, LOCAL);
    dormant.is_active = false;
    let mut sleeping_handicap = handicap("stairs_delivery", Vec::new());
    sleeping_handicap.is_active = false;

    let config = config_with(
        vec![
            rule("late_rule", 20, LOCAL),
            rule("early_rule", 10, LOCAL),
            dormant,
        ],
        vec![handicap("stairs_pickup", Vec::new()), sleeping_handicap],
    );
    let estimator = estimator(config);

    let ids: Vec<&str> = estimator.rules().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["early_rule", "late_rule"]);
    assert_eq!(estimator.handicaps().len(), 1);
}

#[test]
fn rules_apply_in_priority_order() {
    let mut percent = rule("fuel_percent", 10, LOCAL);
    percent.actions = vec![action(ActionKind::AddPercentage, 0.10)];
    let mut fixed = rule("intake_fee", 5, LOCAL);
    fixed.actions = vec![action(ActionKind::AddFixed, 100.0)];

    // Configured out of order; priority decides.
    let config = config_with(vec![percent, fixed], Vec::new());
    let estimate = estimator(config)
        .calculate_estimate(&sample_input())
        .expect("estimate succeeds");

    let ids: Vec<&str> = estimate
        .applied_rules
        .iter()
        .map(|r| r.rule_id.as_str())
        .collect();
    assert_eq!(ids, vec!["intake_fee", "fuel_percent"]);
    // 600 + 100, then 10% of 700.
    assert_eq!(estimate.final_price, 770.0);
}

#[test]
fn full_flow_prices_rules_then_handicaps() {
    let mut input = sample_input();
    input.is_weekend = true;
    input.pickup.stairs_count = 3;

    let estimate = estimator(test_config())
        .calculate_estimate(&input)
        .expect("estimate succeeds");

    assert_eq!(estimate.base_price, 600.0);
    assert_eq!(estimate.applied_rules.len(), 1);
    assert_eq!(estimate.applied_rules[0].price_impact, 60.0);
    assert_eq!(estimate.applied_location_handicaps.len(), 1);
    assert_eq!(estimate.applied_location_handicaps[0].impact, 225.0);
    assert_eq!(estimate.final_price, 885.0);

    let breakdown = &estimate.breakdown;
    assert_eq!(breakdown.base_labor, 600.0);
    assert_eq!(breakdown.seasonal_adjustment, 60.0);
    assert_eq!(breakdown.location_handicaps, 225.0);
    assert_eq!(breakdown.materials, 0.0);
    assert_eq!(breakdown.transportation, 0.0);
    assert_eq!(breakdown.special_services, 0.0);
    assert_eq!(breakdown.taxes, 0.0);
    assert_eq!(breakdown.subtotal, 885.0);
    assert_eq!(breakdown.total, 885.0);
}

#[test]
fn handicaps_price_against_the_post_rule_total() {
    let mut weekend = rule("weekend_surcharge", 60, LOCAL);
    weekend.conditions = vec![condition("is_weekend", ConditionOperator::Eq, json!(true))];
    weekend.actions = vec![action(ActionKind::AddPercentage, 0.10)];

    let mut elevator = handicap(
        "elevator_unavailable_pickup",
        vec![
            condition("pickup.floor_level", ConditionOperator::Gt, json!(1)),
            condition("pickup.has_elevator", ConditionOperator::Eq, json!(false)),
        ],
    );
    elevator.multiplier = 1.05;

    let config = config_with(vec![weekend], vec![elevator]);

    let mut input = sample_input();
    input.is_weekend = true;
    input.pickup.floor_level = 3;

    let estimate = estimator(config)
        .calculate_estimate(&input)
        .expect("estimate succeeds");

    // 5% margin applies to 660, not 600.
    assert_eq!(estimate.applied_location_handicaps[0].impact, 33.0);
    assert_eq!(estimate.final_price, 693.0);
}

#[test]
fn eligible_zero_impact_rules_are_recorded() {
    let mut adjustment = rule(CREW_SIZE_ADJUSTMENT_RULE, 10, LOCAL);
    adjustment.actions = vec![action(ActionKind::AddFixed, 75.0)];
    let config = config_with(vec![adjustment], Vec::new());

    let estimate = estimator(config)
        .calculate_estimate(&sample_input())
        .expect("estimate succeeds");

    assert_eq!(estimate.applied_rules.len(), 1);
    assert_eq!(estimate.applied_rules[0].price_impact, 0.0);
    assert_eq!(estimate.final_price, 600.0);
}

#[test]
fn repeat_calculations_agree_except_for_identity() {
    let estimator = estimator(test_config());
    let mut input = sample_input();
    input.is_weekend = true;

    let first = estimator.calculate_estimate(&input).expect("first estimate");
    let second = estimator.calculate_estimate(&input).expect("second estimate");

    assert_eq!(first.final_price, second.final_price);
    assert_eq!(first.breakdown, second.breakdown);
    assert_eq!(first.metadata.input_hash, second.metadata.input_hash);
    assert_eq!(first.estimate_id.0, "est-000001");
    assert_eq!(second.estimate_id.0, "est-000002");
}

#[test]
fn non_finite_inputs_are_rejected() {
    let estimator = estimator(test_config());

    let mut input = sample_input();
    input.total_weight_lbs = f64::NAN;
    match estimator.calculate_estimate(&input) {
        Err(EstimateError::NonFiniteInput { field }) => assert_eq!(field, "total_weight_lbs"),
        other => panic!("expected non-finite rejection, got {other:?}"),
    }

    let mut input = sample_input();
    input.delivery.parking_distance_feet = f64::INFINITY;
    match estimator.calculate_estimate(&input) {
        Err(EstimateError::NonFiniteInput { field }) => {
            assert_eq!(field, "delivery.parking_distance_feet");
        }
        other => panic!("expected non-finite rejection, got {other:?}"),
    }
}

#[test]
fn metadata_is_stamped() {
    let estimate = estimator(test_config())
        .calculate_estimate(&sample_input())
        .expect("estimate succeeds");

    assert_eq!(estimate.metadata.calculated_by, "relo-pricing-engine");
    assert_eq!(estimate.metadata.rules_version, 3);
    assert!(estimate.metadata.deterministic);
    assert_eq!(estimate.metadata.input_hash.len(), 64);
}

#[test]
fn hash_algorithm_is_configurable() {
    let estimate = estimator(test_config())
        .with_hash_algorithm(HashAlgorithm::Fnv1a)
        .calculate_estimate(&sample_input())
        .expect("estimate succeeds");

    assert_eq!(estimate.metadata.input_hash.len(), 16);
}
