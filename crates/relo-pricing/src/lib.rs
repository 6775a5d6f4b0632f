//! Deterministic pricing engine for relocation quotes: declarative rules,
//! location handicaps, tariff-table base pricing with legacy formula
//! fallbacks, and reproducible input fingerprints, plus the HTTP surface
//! that exposes quoting to the rest of the platform.

pub mod config;
pub mod error;
pub mod pricing;
pub mod telemetry;
