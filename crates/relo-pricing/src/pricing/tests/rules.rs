use serde_json::json;

use super::common::*;
use crate::pricing::domain::ServiceType;
use crate::pricing::rule_applier::{
    apply, should_apply, CREW_SIZE_ADJUSTMENT_RULE, FRAGILE_ITEMS_RULE,
};
use crate::pricing::rules::{ActionKind, ConditionOperator};

const LOCAL: &[ServiceType] = &[ServiceType::Local];

#[test]
fn inactive_rules_never_apply() {
    let mut rule = rule("weekend_surcharge", 60, LOCAL);
    rule.is_active = false;
    assert!(!should_apply(&rule, &sample_input()));
}

#[test]
fn empty_service_list_matches_nothing() {
    let rule = rule("weekend_surcharge", 60, &[]);
    assert!(!should_apply(&rule, &sample_input()));
}

#[test]
fn service_must_be_listed() {
    let rule = rule("line_haul_minimum", 10, &[ServiceType::LongDistance]);
    assert!(!should_apply(&rule, &sample_input()));

    let mut input = sample_input();
    input.service_type = ServiceType::LongDistance;
    assert!(should_apply(&rule, &input));
}

#[test]
fn effective_window_compares_against_the_move_date() {
    let mut rule = rule("spring_promo", 10, LOCAL);

    rule.effective_from = Some(utc(2026, 11, 1));
    assert!(!should_apply(&rule, &sample_input()));

    rule.effective_from = Some(utc(2026, 9, 1));
    assert!(should_apply(&rule, &sample_input()));

    rule.effective_to = Some(utc(2026, 9, 30));
    assert!(!should_apply(&rule, &sample_input()));
}

#[test]
fn undated_moves_pass_every_effective_window() {
    let mut rule = rule("spring_promo", 10, LOCAL);
    rule.effective_from = Some(utc(2026, 11, 1));
    rule.effective_to = Some(utc(2026, 11, 30));

    let mut input = sample_input();
    input.move_date = None;
    assert!(should_apply(&rule, &input));
}

#[test]
fn failing_conditions_block_application() {
    let mut rule = rule("holiday_surcharge", 65, LOCAL);
    rule.conditions = vec![condition("is_holiday", ConditionOperator::Eq, json!(true))];
    assert!(!should_apply(&rule, &sample_input()));

    let mut input = sample_input();
    input.is_holiday = true;
    assert!(should_apply(&rule, &input));
}

#[test]
fn actions_read_one_price_snapshot() {
    let mut rule = rule("double_percent", 10, LOCAL);
    rule.actions = vec![
        action(ActionKind::AddPercentage, 0.10),
        action(ActionKind::AddPercentage, 0.10),
    ];

    let applied = apply(&rule, &sample_input(), 600.0);
    // Both read 600.00; the second does not see the first's delta.
    assert_eq!(applied.price_impact, 120.0);
}

#[test]
fn crew_size_adjustment_scales_by_extra_crew_and_hours() {
    let mut rule = rule(CREW_SIZE_ADJUSTMENT_RULE, 10, LOCAL);
    rule.actions = vec![action(ActionKind::AddFixed, 75.0)];

    let mut input = sample_input();
    input.crew_size = 4;
    input.estimated_duration_hours = 8.0;
    let applied = apply(&rule, &input, 2400.0);
    assert_eq!(applied.price_impact, 1200.0);

    input.crew_size = 2;
    let applied = apply(&rule, &input, 1200.0);
    assert_eq!(applied.price_impact, 0.0);
}

#[test]
fn fragile_surcharge_counts_items_over_the_allowance() {
    let mut rule = rule(FRAGILE_ITEMS_RULE, 40, LOCAL);
    rule.actions = vec![action(ActionKind::AddFixed, 15.0)];

    let mut input = sample_input();
    input.special_items.fragile_items = 9;
    let applied = apply(&rule, &input, 600.0);
    assert_eq!(applied.price_impact, 60.0);

    input.special_items.fragile_items = 3;
    let applied = apply(&rule, &input, 600.0);
    assert_eq!(applied.price_impact, 0.0);
}

#[test]
fn multiply_targets_weight_or_the_running_price() {
    let mut per_pound = rule("oversize_load", 20, LOCAL);
    let mut weight_action = action(ActionKind::Multiply, 0.05);
    weight_action.target_field = Some("total_weight_lbs".to_string());
    per_pound.actions = vec![weight_action];

    let applied = apply(&per_pound, &sample_input(), 600.0);
    assert_eq!(applied.price_impact, 200.0);

    let mut scaled = rule("specialty_crew_premium", 20, LOCAL);
    scaled.actions = vec![action(ActionKind::Multiply, 1.25)];
    let applied = apply(&scaled, &sample_input(), 600.0);
    assert_eq!(applied.price_impact, 150.0);

    // Unrecognized targets fall back to price scaling.
    let mut odd_target = rule("specialty_crew_premium", 20, LOCAL);
    let mut odd_action = action(ActionKind::Multiply, 1.25);
    odd_action.target_field = Some("carrier.fleet_size".to_string());
    odd_target.actions = vec![odd_action];
    let applied = apply(&odd_target, &sample_input(), 600.0);
    assert_eq!(applied.price_impact, 150.0);
}

#[test]
fn clamps_and_replace_express_deltas() {
    let mut minimum = rule("line_haul_minimum", 15, LOCAL);
    minimum.actions = vec![action(ActionKind::SetMinimum, 1200.0)];
    assert_eq!(apply(&minimum, &sample_input(), 800.0).price_impact, 400.0);
    assert_eq!(apply(&minimum, &sample_input(), 1500.0).price_impact, 0.0);

    let mut maximum = rule("promo_cap", 15, LOCAL);
    maximum.actions = vec![action(ActionKind::SetMaximum, 1000.0)];
    assert_eq!(apply(&maximum, &sample_input(), 1500.0).price_impact, -500.0);
    assert_eq!(apply(&maximum, &sample_input(), 800.0).price_impact, 0.0);

    let mut replace = rule("flat_quote", 15, LOCAL);
    replace.actions = vec![action(ActionKind::Replace, 750.0)];
    assert_eq!(apply(&replace, &sample_input(), 600.0).price_impact, 150.0);
    assert_eq!(apply(&replace, &sample_input(), 900.0).price_impact, -150.0);
}

#[test]
fn rules_without_actions_report_zero_impact() {
    let rule = rule("placeholder", 10, LOCAL);
    let applied = apply(&rule, &sample_input(), 600.0);
    assert_eq!(applied.price_impact, 0.0);
    assert_eq!(applied.calculation, "no actions configured");
}

#[test]
fn rule_impact_rounds_to_cents() {
    let mut rule = rule("odd_percent", 10, LOCAL);
    rule.actions = vec![action(ActionKind::AddPercentage, 0.0333)];
    let applied = apply(&rule, &sample_input(), 100.0);
    assert_eq!(applied.price_impact, 3.33);
}
