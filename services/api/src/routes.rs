use crate::infra::{deserialize_optional_date, standard_pricing_config, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use relo_pricing::error::AppError;
use relo_pricing::pricing::{
    estimate_router, validate_input, AppliedHandicap, AppliedRule, EstimateInput,
    EstimateRepository, PriceBreakdown, PriceEstimator, PricingConfig, QuoteService,
    ValidationReport,
};

#[derive(Debug, Deserialize)]
pub(crate) struct QuotePreviewRequest {
    pub(crate) input: EstimateInput,
    #[serde(default)]
    pub(crate) rules: Option<PricingConfig>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) include_breakdown: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuotePreviewResponse {
    pub(crate) rule_source: PreviewRuleSource,
    pub(crate) today: NaiveDate,
    pub(crate) validation: ValidationReport,
    pub(crate) base_price: f64,
    pub(crate) final_price: f64,
    pub(crate) applied_rules: Vec<AppliedRule>,
    pub(crate) applied_location_handicaps: Vec<AppliedHandicap>,
    pub(crate) input_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) breakdown: Option<PriceBreakdown>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PreviewRuleSource {
    Custom,
    Standard,
}

pub(crate) fn with_estimate_routes<R>(service: Arc<QuoteService<R>>) -> axum::Router
where
    R: EstimateRepository + 'static,
{
    estimate_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/estimates/preview",
            axum::routing::post(quote_preview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn quote_preview_endpoint(
    Json(payload): Json<QuotePreviewRequest>,
) -> Result<Json<QuotePreviewResponse>, AppError> {
    let QuotePreviewRequest {
        input,
        rules,
        today,
        include_breakdown,
    } = payload;

    let (config, rule_source) = match rules {
        Some(config) => (config, PreviewRuleSource::Custom),
        None => (standard_pricing_config(), PreviewRuleSource::Standard),
    };

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let validation = validate_input(&input, today);
    let estimate = PriceEstimator::new(config).calculate_estimate(&input)?;

    let breakdown = if include_breakdown {
        Some(estimate.breakdown)
    } else {
        None
    };

    Ok(Json(QuotePreviewResponse {
        rule_source,
        today,
        validation,
        base_price: estimate.base_price,
        final_price: estimate.final_price,
        applied_rules: estimate.applied_rules,
        applied_location_handicaps: estimate.applied_location_handicaps,
        input_hash: estimate.metadata.input_hash,
        breakdown,
    }))
}
