//! Relocation quote pricing.
//!
//! The engine prices an immutable input snapshot in fixed stages: base
//! price resolution, rule application in priority order, location
//! handicap application, then breakdown composition and input
//! fingerprinting. Every stage is deterministic, so equal inputs under
//! equal configuration always produce equal prices.

pub(crate) mod base_price;
pub(crate) mod breakdown;
pub(crate) mod conditions;
pub mod domain;
pub mod estimator;
pub(crate) mod fields;
pub(crate) mod handicaps;
pub(crate) mod hashing;
pub mod repository;
pub mod router;
pub(crate) mod rule_applier;
pub mod rules;
pub mod service;
pub mod sizing;
pub mod tariffs;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    AccessDifficulty, AdditionalServices, AppliedHandicap, AppliedRule, EstimateId,
    EstimateInput, EstimateMetadata, EstimateResult, HandicapSide, LocationDetails,
    PriceBreakdown, ServiceType, SpecialItems,
};
pub use estimator::{
    EstimateError, EstimateIdSource, PriceEstimator, PricingConfig, UuidEstimateIds,
};
pub use hashing::{HashAlgorithm, ENGINE_VERSION};
pub use repository::{EstimateRepository, RepositoryError};
pub use router::{estimate_router, SizingRequest};
pub use rule_applier::{CREW_SIZE_ADJUSTMENT_RULE, FRAGILE_ITEMS_RULE};
pub use rules::{
    ActionKind, ConditionOperator, LocationHandicap, LogicalOperator, PricingRule, RuleAction,
    RuleCategory, RuleCondition,
};
pub use service::{QuoteService, QuoteServiceError};
pub use sizing::SizingRecommendation;
pub use tariffs::{
    AutoPricingTables, CrewRateTable, CrewThreshold, DayOfWeek, DayRate, DistanceRateBracket,
    HandicapCategory, HandicapTariff, TariffSettings, TruckThreshold,
};
pub use validation::{validate_input, ValidationReport};
