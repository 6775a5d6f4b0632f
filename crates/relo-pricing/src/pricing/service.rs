//! Quote workflow on top of the estimator: validate, price, persist.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use crate::pricing::domain::{EstimateId, EstimateInput, EstimateResult};
use crate::pricing::estimator::{EstimateError, PriceEstimator};
use crate::pricing::repository::{EstimateRepository, RepositoryError};
use crate::pricing::sizing::SizingRecommendation;
use crate::pricing::validation::{validate_input, ValidationReport};

#[derive(Debug, Error)]
pub enum QuoteServiceError {
    #[error("estimate input failed validation")]
    Invalid(ValidationReport),
    #[error(transparent)]
    Estimate(#[from] EstimateError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Coordinates validation, pricing, and persistence for quote requests.
pub struct QuoteService<R: EstimateRepository + 'static> {
    repository: Arc<R>,
    estimator: Arc<PriceEstimator>,
}

impl<R: EstimateRepository + 'static> QuoteService<R> {
    pub fn new(repository: Arc<R>, estimator: PriceEstimator) -> Self {
        Self {
            repository,
            estimator: Arc::new(estimator),
        }
    }

    /// Validates, prices, and stores one estimate. Inputs that fail
    /// validation never reach the estimator.
    pub fn quote(
        &self,
        input: &EstimateInput,
        today: NaiveDate,
    ) -> Result<EstimateResult, QuoteServiceError> {
        let report = validate_input(input, today);
        if !report.valid {
            return Err(QuoteServiceError::Invalid(report));
        }

        let estimate = self.estimator.calculate_estimate(input)?;
        let stored = self.repository.insert(estimate)?;
        tracing::info!(
            estimate_id = %stored.estimate_id.0,
            final_price = stored.final_price,
            "stored estimate"
        );
        Ok(stored)
    }

    /// Looks up a stored estimate. Absence is a `NotFound` error.
    pub fn fetch(&self, id: &EstimateId) -> Result<EstimateResult, QuoteServiceError> {
        Ok(self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?)
    }

    /// Runs validation alone, without pricing or persisting.
    pub fn validation(&self, input: &EstimateInput, today: NaiveDate) -> ValidationReport {
        validate_input(input, today)
    }

    /// Staffing recommendation for a job volume.
    pub fn sizing(&self, cubic_feet: f64, crew_size: Option<u32>) -> SizingRecommendation {
        self.estimator.sizing(cubic_feet, crew_size)
    }

    pub fn estimator(&self) -> &PriceEstimator {
        &self.estimator
    }
}
