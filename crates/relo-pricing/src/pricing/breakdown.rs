//! Breakdown composition for display. Rule impacts are bucketed by id
//! text and the checks are independent, so one charge can land in more
//! than one bucket and a charge whose id matches no needle appears only
//! in the total. The subtotal sums the buckets, not the final price.

use crate::pricing::domain::{
    round_to_cents, AppliedHandicap, AppliedRule, PriceBreakdown,
};

/// Builds the display breakdown from the applied charges.
pub fn compose(
    base_price: f64,
    applied_rules: &[AppliedRule],
    applied_handicaps: &[AppliedHandicap],
    final_price: f64,
) -> PriceBreakdown {
    let mut materials = 0.0;
    let mut transportation = 0.0;
    let mut special_services = 0.0;
    let mut seasonal_adjustment = 0.0;

    for rule in applied_rules {
        let id = rule.rule_id.as_str();
        if id.contains("distance") {
            transportation += rule.price_impact;
        }
        if id.contains("piano") || id.contains("antique") || id.contains("fragile") {
            special_services += rule.price_impact;
        }
        if id.contains("weekend") || id.contains("season") {
            seasonal_adjustment += rule.price_impact;
        }
        if id.contains("packing_service_rate") || id.contains("assembly_service") {
            materials += rule.price_impact;
        }
    }

    let location_handicaps: f64 = applied_handicaps.iter().map(|h| h.impact).sum();

    let base_labor = round_to_cents(base_price);
    let materials = round_to_cents(materials);
    let transportation = round_to_cents(transportation);
    let location_handicaps = round_to_cents(location_handicaps);
    let special_services = round_to_cents(special_services);
    let seasonal_adjustment = round_to_cents(seasonal_adjustment);

    let subtotal = round_to_cents(
        base_labor
            + materials
            + transportation
            + location_handicaps
            + special_services
            + seasonal_adjustment,
    );

    PriceBreakdown {
        base_labor,
        materials,
        transportation,
        location_handicaps,
        special_services,
        seasonal_adjustment,
        subtotal,
        taxes: 0.0,
        total: final_price,
    }
}
