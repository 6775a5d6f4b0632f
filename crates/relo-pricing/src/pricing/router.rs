use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::pricing::domain::{EstimateId, EstimateInput};
use crate::pricing::repository::{EstimateRepository, RepositoryError};
use crate::pricing::service::{QuoteService, QuoteServiceError};

/// Body for the sizing endpoint.
#[derive(Debug, Deserialize)]
pub struct SizingRequest {
    pub cubic_feet: f64,
    #[serde(default)]
    pub crew_size: Option<u32>,
}

/// Router builder exposing HTTP endpoints for quoting, lookup,
/// validation, and sizing.
pub fn estimate_router<R>(service: Arc<QuoteService<R>>) -> Router
where
    R: EstimateRepository + 'static,
{
    Router::new()
        .route("/api/v1/estimates", post(quote_handler::<R>))
        .route("/api/v1/estimates/:estimate_id", get(fetch_handler::<R>))
        .route("/api/v1/estimates/validate", post(validate_handler::<R>))
        .route("/api/v1/estimates/sizing", post(sizing_handler::<R>))
        .with_state(service)
}

pub(crate) async fn quote_handler<R>(
    State(service): State<Arc<QuoteService<R>>>,
    axum::Json(input): axum::Json<EstimateInput>,
) -> Response
where
    R: EstimateRepository + 'static,
{
    let today = chrono::Local::now().date_naive();
    match service.quote(&input, today) {
        Ok(estimate) => (StatusCode::OK, axum::Json(estimate)).into_response(),
        Err(QuoteServiceError::Invalid(report)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(report)).into_response()
        }
        Err(QuoteServiceError::Estimate(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(QuoteServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "estimate already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<QuoteService<R>>>,
    Path(estimate_id): Path<String>,
) -> Response
where
    R: EstimateRepository + 'static,
{
    let id = EstimateId(estimate_id);
    match service.fetch(&id) {
        Ok(estimate) => (StatusCode::OK, axum::Json(estimate)).into_response(),
        Err(QuoteServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "estimate not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn validate_handler<R>(
    State(service): State<Arc<QuoteService<R>>>,
    axum::Json(input): axum::Json<EstimateInput>,
) -> Response
where
    R: EstimateRepository + 'static,
{
    let today = chrono::Local::now().date_naive();
    let report = service.validation(&input, today);
    (StatusCode::OK, axum::Json(report)).into_response()
}

pub(crate) async fn sizing_handler<R>(
    State(service): State<Arc<QuoteService<R>>>,
    axum::Json(request): axum::Json<SizingRequest>,
) -> Response
where
    R: EstimateRepository + 'static,
{
    let recommendation = service.sizing(request.cubic_feet, request.crew_size);
    (StatusCode::OK, axum::Json(recommendation)).into_response()
}
