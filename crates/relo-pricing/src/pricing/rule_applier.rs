//! Rule eligibility and application. Every action inside a rule reads the
//! same price snapshot taken before the rule ran, so actions within one
//! rule never compound on each other.

use chrono::{DateTime, Utc};

use crate::pricing::conditions::conditions_pass;
use crate::pricing::domain::{round_to_cents, AppliedRule, EstimateInput};
use crate::pricing::fields::FieldPath;
use crate::pricing::rules::{ActionKind, PricingRule, RuleAction};

/// Rule id whose `add_fixed` amount scales by extra crew and duration.
pub const CREW_SIZE_ADJUSTMENT_RULE: &str = "crew_size_adjustment";
/// Rule id whose `add_fixed` amount scales by fragile items over the
/// included allowance.
pub const FRAGILE_ITEMS_RULE: &str = "fragile_items_surcharge";

const INCLUDED_CREW: u32 = 2;
const INCLUDED_FRAGILE_ITEMS: u32 = 5;

/// Whether a rule is eligible for this input.
///
/// A rule with an empty `applicable_services` list applies to nothing.
/// Effective-window bounds only disqualify when the input has a move date
/// to compare against.
pub fn should_apply(rule: &PricingRule, input: &EstimateInput) -> bool {
    if !rule.is_active {
        return false;
    }
    if !rule.applicable_services.contains(&input.service_type) {
        return false;
    }
    if !within_effective_window(rule, input.move_date) {
        return false;
    }
    conditions_pass(&rule.conditions, input)
}

/// Runs every action of an eligible rule against the price snapshot and
/// returns the rule's combined, rounded price impact with its audit trail.
pub fn apply(rule: &PricingRule, input: &EstimateInput, current_price: f64) -> AppliedRule {
    if rule.actions.is_empty() {
        return AppliedRule {
            rule_id: rule.id.clone(),
            name: rule.name.clone(),
            description: rule.description.clone(),
            price_impact: 0.0,
            calculation: "no actions configured".to_string(),
        };
    }

    let mut delta = 0.0;
    let mut notes = Vec::with_capacity(rule.actions.len());
    for action in &rule.actions {
        let (action_delta, note) = action_delta(rule, action, input, current_price);
        delta += action_delta;
        notes.push(note);
    }

    AppliedRule {
        rule_id: rule.id.clone(),
        name: rule.name.clone(),
        description: rule.description.clone(),
        price_impact: round_to_cents(delta),
        calculation: notes.join("; "),
    }
}

fn within_effective_window(rule: &PricingRule, move_date: Option<DateTime<Utc>>) -> bool {
    let Some(date) = move_date else {
        return true;
    };
    if rule.effective_from.is_some_and(|from| date < from) {
        return false;
    }
    if rule.effective_to.is_some_and(|to| date > to) {
        return false;
    }
    true
}

fn action_delta(
    rule: &PricingRule,
    action: &RuleAction,
    input: &EstimateInput,
    current_price: f64,
) -> (f64, String) {
    match action.kind {
        ActionKind::AddFixed => add_fixed_delta(rule, action, input),
        ActionKind::AddPercentage => {
            let delta = current_price * action.amount;
            let note = format!(
                "{:.1}% of {:.2} = {:.2}",
                action.amount * 100.0,
                current_price,
                delta
            );
            (delta, note)
        }
        ActionKind::Multiply => {
            let targets_weight = action.target_field.as_deref().and_then(FieldPath::parse)
                == Some(FieldPath::TotalWeightLbs);
            if targets_weight {
                let delta = input.total_weight_lbs * action.amount;
                let note = format!(
                    "{:.2}/lb x {} lbs = {:.2}",
                    action.amount, input.total_weight_lbs, delta
                );
                (delta, note)
            } else {
                let delta = current_price * (action.amount - 1.0);
                (delta, format!("price x {:.2} = {:+.2}", action.amount, delta))
            }
        }
        ActionKind::SetMinimum => {
            let delta = (action.amount - current_price).max(0.0);
            let note = format!(
                "minimum {:.2} against {:.2} = {:.2}",
                action.amount, current_price, delta
            );
            (delta, note)
        }
        ActionKind::SetMaximum => {
            let delta = -(current_price - action.amount).max(0.0);
            let note = format!(
                "maximum {:.2} against {:.2} = {:.2}",
                action.amount, current_price, delta
            );
            (delta, note)
        }
        ActionKind::Replace => {
            let delta = action.amount - current_price;
            let note = format!("replaced {:.2} with {:.2}", current_price, action.amount);
            (delta, note)
        }
    }
}

fn add_fixed_delta(rule: &PricingRule, action: &RuleAction, input: &EstimateInput) -> (f64, String) {
    if rule.id == CREW_SIZE_ADJUSTMENT_RULE {
        let extra_crew = input.crew_size.saturating_sub(INCLUDED_CREW);
        let delta = action.amount * f64::from(extra_crew) * input.estimated_duration_hours;
        let note = format!(
            "{:.2}/hr x {} extra crew x {}h = {:.2}",
            action.amount, extra_crew, input.estimated_duration_hours, delta
        );
        return (delta, note);
    }
    if rule.id == FRAGILE_ITEMS_RULE {
        let chargeable = input
            .special_items
            .fragile_items
            .saturating_sub(INCLUDED_FRAGILE_ITEMS);
        let delta = action.amount * f64::from(chargeable);
        let note = format!(
            "{:.2} x {} fragile items over the included {} = {:.2}",
            action.amount, chargeable, INCLUDED_FRAGILE_ITEMS, delta
        );
        return (delta, note);
    }
    (action.amount, format!("fixed {:.2}", action.amount))
}
