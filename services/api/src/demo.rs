use crate::infra::{resolve_pricing_config, InMemoryEstimateRepository};
use chrono::{Datelike, Local, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use relo_pricing::error::AppError;
use relo_pricing::pricing::{
    validate_input, AdditionalServices, EstimateInput, EstimateRepository, EstimateResult,
    LocationDetails, PriceEstimator, QuoteService, QuoteServiceError, ServiceType, SpecialItems,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Move date (YYYY-MM-DD). Defaults to three weeks from today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) move_date: Option<NaiveDate>,
    /// Pricing configuration file (JSON). Defaults to the built-in standard set.
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Tariff tables file (JSON) replacing the configuration's tariffs.
    #[arg(long)]
    pub(crate) tariffs: Option<PathBuf>,
    /// Skip the crew sizing portion of the demo output.
    #[arg(long)]
    pub(crate) skip_sizing: bool,
}

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// Estimate input file (JSON)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Pricing configuration file (JSON). Defaults to the built-in standard set.
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Tariff tables file (JSON) replacing the configuration's tariffs.
    #[arg(long)]
    pub(crate) tariffs: Option<PathBuf>,
    /// Override the intake date used for validation (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub(crate) pretty: bool,
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let EstimateArgs {
        input,
        rules,
        tariffs,
        today,
        pretty,
    } = args;

    let raw = std::fs::read_to_string(input)?;
    let input: EstimateInput = serde_json::from_str(&raw)?;
    let config = resolve_pricing_config(rules, tariffs)?;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let report = validate_input(&input, today);
    if !report.valid {
        println!("{}", render_json(&report, pretty)?);
        return Ok(());
    }

    let estimate = PriceEstimator::new(config).calculate_estimate(&input)?;
    println!("{}", render_json(&estimate, pretty)?);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        move_date,
        rules,
        tariffs,
        skip_sizing,
    } = args;

    let move_date =
        move_date.unwrap_or_else(|| Local::now().date_naive() + chrono::Duration::days(21));
    let today = Local::now().date_naive();
    let custom_rules = rules.is_some();
    let config = resolve_pricing_config(rules, tariffs)?;

    println!("Relocation pricing demo");
    println!("Move date: {move_date} (quoted {today})");
    if custom_rules {
        println!("Rule set: custom configuration file");
    } else {
        println!("Rule set: built-in standard set");
    }

    let repository = Arc::new(InMemoryEstimateRepository::default());
    let service = QuoteService::new(repository.clone(), PriceEstimator::new(config));

    let input = demo_move_input(move_date);
    let estimate = match service.quote(&input, today) {
        Ok(estimate) => estimate,
        Err(QuoteServiceError::Invalid(report)) => {
            println!("\nIntake validation failed");
            for error in &report.errors {
                println!("- {error}");
            }
            return Ok(());
        }
        Err(err) => {
            println!("\nQuote unavailable: {err}");
            return Ok(());
        }
    };

    render_estimate(&input, &estimate);

    match serde_json::to_string_pretty(&estimate.metadata) {
        Ok(json) => println!("\nProvenance payload:\n{json}"),
        Err(err) => println!("\nProvenance payload unavailable: {err}"),
    }

    match repository.fetch(&estimate.estimate_id) {
        Ok(Some(stored)) => println!(
            "\nStored as {} (lookup returns {:.2})",
            stored.estimate_id.0, stored.final_price
        ),
        Ok(None) => println!("\nRepository lookup returned no record"),
        Err(err) => println!("\nRepository unavailable: {err}"),
    }

    if skip_sizing {
        return Ok(());
    }

    let sizing = service.sizing(input.total_volume_cuft, None);
    println!("\nCrew sizing recommendation");
    println!(
        "- {} movers with {} truck(s), about {:.1} hours on site",
        sizing.crew_size, sizing.truck_count, sizing.estimated_hours
    );

    Ok(())
}

fn render_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, AppError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

fn render_estimate(input: &EstimateInput, estimate: &EstimateResult) {
    println!("\nJob profile");
    println!(
        "- {} move, {:.0} lbs / {:.0} cuft over {:.0} miles",
        input.service_type.label(),
        input.total_weight_lbs,
        input.total_volume_cuft,
        input.distance_miles
    );
    println!(
        "- Crew of {} for {:.1} estimated hours",
        input.crew_size, input.estimated_duration_hours
    );

    println!("\nBase price: {:.2}", estimate.base_price);

    if estimate.applied_rules.is_empty() {
        println!("\nApplied rules: none");
    } else {
        println!("\nApplied rules");
        for rule in &estimate.applied_rules {
            println!(
                "- {}: {:+.2} ({})",
                rule.name, rule.price_impact, rule.calculation
            );
        }
    }

    if estimate.applied_location_handicaps.is_empty() {
        println!("\nSite conditions: none");
    } else {
        println!("\nSite conditions");
        for handicap in &estimate.applied_location_handicaps {
            println!(
                "- {} [{}]: {:+.2} ({})",
                handicap.name,
                handicap.side.label(),
                handicap.impact,
                handicap.calculation
            );
        }
    }

    let breakdown = &estimate.breakdown;
    println!("\nPrice breakdown");
    println!("- Base labor: {:.2}", breakdown.base_labor);
    println!("- Materials: {:.2}", breakdown.materials);
    println!("- Transportation: {:.2}", breakdown.transportation);
    println!("- Site conditions: {:.2}", breakdown.location_handicaps);
    println!("- Special services: {:.2}", breakdown.special_services);
    println!("- Seasonal adjustment: {:.2}", breakdown.seasonal_adjustment);
    println!(
        "- Subtotal {:.2} | Taxes {:.2}",
        breakdown.subtotal, breakdown.taxes
    );

    println!("\nFinal price: {:.2}", estimate.final_price);
    println!("Input fingerprint: {}", estimate.metadata.input_hash);
}

fn demo_move_input(move_date: NaiveDate) -> EstimateInput {
    let move_timestamp = Utc.from_utc_datetime(&move_date.and_time(NaiveTime::MIN));
    let is_weekend = matches!(move_date.weekday(), Weekday::Sat | Weekday::Sun);

    EstimateInput {
        customer_id: "demo-0001".to_string(),
        service_type: ServiceType::Local,
        move_date: Some(move_timestamp),
        total_weight_lbs: 6500.0,
        total_volume_cuft: 850.0,
        distance_miles: 18.0,
        crew_size: 3,
        estimated_duration_hours: 6.0,
        is_weekend,
        pickup: LocationDetails {
            address: "412 Alder Row".to_string(),
            stairs_count: 1,
            ..LocationDetails::default()
        },
        delivery: LocationDetails {
            address: "90 Quarry Hill Road".to_string(),
            floor_level: 2,
            has_elevator: true,
            parking_distance_feet: 120.0,
            ..LocationDetails::default()
        },
        special_items: SpecialItems {
            piano_count: 1,
            fragile_items: 8,
            ..SpecialItems::default()
        },
        additional_services: AdditionalServices {
            packing: true,
            disassembly: true,
            ..AdditionalServices::default()
        },
        ..EstimateInput::default()
    }
}
