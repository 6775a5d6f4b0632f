use thiserror::Error;

use crate::pricing::domain::{EstimateId, EstimateResult};

/// Storage failures surfaced to the service layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Persistence boundary for generated estimates. Implementations decide
/// durability; the engine only needs insert and lookup.
pub trait EstimateRepository: Send + Sync {
    fn insert(&self, estimate: EstimateResult) -> Result<EstimateResult, RepositoryError>;

    fn fetch(&self, id: &EstimateId) -> Result<Option<EstimateResult>, RepositoryError>;
}
