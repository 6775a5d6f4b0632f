//! Location handicap application. Handicaps carry no explicit side or
//! category in configuration; both are inferred, the side from which end
//! the conditions inspect and the category from the id and name text.

use crate::pricing::conditions::conditions_pass;
use crate::pricing::domain::{
    round_to_cents, AppliedHandicap, EstimateInput, HandicapSide,
};
use crate::pricing::fields::FieldPath;
use crate::pricing::rules::LocationHandicap;
use crate::pricing::tariffs::{HandicapCategory, HandicapTariff, TariffSettings};

/// Whether an active handicap's conditions hold for this input.
pub fn should_apply(handicap: &LocationHandicap, input: &EstimateInput) -> bool {
    handicap.is_active && conditions_pass(&handicap.conditions, input)
}

/// Infers which end of the move the handicap charges for. Conditions
/// touching only pickup fields pin it to pickup, only delivery fields to
/// delivery; anything else charges both ends.
pub fn side_of(handicap: &LocationHandicap) -> HandicapSide {
    let mut touches_pickup = false;
    let mut touches_delivery = false;
    for condition in &handicap.conditions {
        match FieldPath::parse(&condition.field) {
            Some(FieldPath::Pickup(_)) => touches_pickup = true,
            Some(FieldPath::Delivery(_)) => touches_delivery = true,
            _ => {}
        }
    }
    match (touches_pickup, touches_delivery) {
        (true, false) => HandicapSide::Pickup,
        (false, true) => HandicapSide::Delivery,
        _ => HandicapSide::Both,
    }
}

/// Infers the tariff category from the handicap's id and name.
pub fn category_of(handicap: &LocationHandicap) -> Option<HandicapCategory> {
    let haystack = format!("{} {}", handicap.id, handicap.name).to_lowercase();
    if haystack.contains("stair") || haystack.contains("flight") {
        Some(HandicapCategory::Stairs)
    } else if haystack.contains("elevator") {
        Some(HandicapCategory::Elevator)
    } else if haystack.contains("carry") {
        Some(HandicapCategory::LongCarry)
    } else {
        None
    }
}

/// Computes the handicap's price impact against the running price.
///
/// A matching active tariff row wins over the handicap's own legacy
/// fields. Handicaps whose category cannot be inferred always price
/// through the legacy fields.
pub fn apply(
    handicap: &LocationHandicap,
    input: &EstimateInput,
    tariffs: Option<&TariffSettings>,
    current_price: f64,
) -> AppliedHandicap {
    let side = side_of(handicap);
    let category = category_of(handicap);

    if let (Some(tariffs), Some(category)) = (tariffs, category) {
        let row = tariffs
            .handicaps
            .iter()
            .find(|row| row.is_active && row.category == category);
        if let Some(row) = row {
            return tariff_impact(handicap, input, side, category, row, current_price);
        }
    }

    legacy_impact(handicap, input, side, category, current_price)
}

fn tariff_impact(
    handicap: &LocationHandicap,
    input: &EstimateInput,
    side: HandicapSide,
    category: HandicapCategory,
    row: &HandicapTariff,
    current_price: f64,
) -> AppliedHandicap {
    let mut impact = current_price * (row.percentage / 100.0);
    let mut calculation = format!("{:.1}% of {:.2}", row.percentage, current_price);

    if row.per_unit && category == HandicapCategory::Stairs {
        let flights = (input.pickup.stairs_count + input.delivery.stairs_count).max(1);
        impact *= f64::from(flights);
        calculation = format!("{calculation} x {flights} flights");
    }

    let impact = round_to_cents(impact);
    AppliedHandicap {
        handicap_id: handicap.id.clone(),
        name: handicap.name.clone(),
        side,
        impact,
        calculation: format!("{calculation} = {impact:.2}"),
    }
}

fn legacy_impact(
    handicap: &LocationHandicap,
    input: &EstimateInput,
    side: HandicapSide,
    category: Option<HandicapCategory>,
    current_price: f64,
) -> AppliedHandicap {
    let mut impact = 0.0;
    let mut notes = Vec::new();

    if let Some(fixed) = handicap.fixed_amount {
        if category == Some(HandicapCategory::Stairs) {
            // Zero recorded flights still bill one.
            let flights = side_flights(input, side).max(1);
            impact += fixed * f64::from(flights);
            notes.push(format!("fixed {fixed:.2} x {flights} flights"));
        } else {
            impact += fixed;
            notes.push(format!("fixed {fixed:.2}"));
        }
    }

    if (handicap.multiplier - 1.0).abs() > f64::EPSILON {
        let extra = current_price * (handicap.multiplier - 1.0);
        impact += extra;
        notes.push(format!("price x {:.2} = {extra:+.2}", handicap.multiplier));
    }

    if notes.is_empty() {
        notes.push("no charge configured".to_string());
    }

    AppliedHandicap {
        handicap_id: handicap.id.clone(),
        name: handicap.name.clone(),
        side,
        impact: round_to_cents(impact),
        calculation: notes.join("; "),
    }
}

fn side_flights(input: &EstimateInput, side: HandicapSide) -> u32 {
    match side {
        HandicapSide::Pickup => input.pickup.stairs_count,
        HandicapSide::Delivery => input.delivery.stairs_count,
        HandicapSide::Both => input.pickup.stairs_count + input.delivery.stairs_count,
    }
}
