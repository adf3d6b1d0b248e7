//! Singapore income-tax computation core.
//!
//! Everything in this crate is a pure, synchronous computation over the
//! static bracket table in [`brackets`]. Callers validate their inputs
//! before invoking it; see the `sgtax-cli` validation module.

pub mod brackets;
pub mod calculations;
pub mod models;

pub use calculations::{
    NoSuggestionReason, OverLimit, ReliefAnalysis, ReliefOpportunity, ReliefOptimizer,
    ReliefOutcome, TaxEngine, TaxEngineError, analyze_relief, calculate_tax,
    calculate_tax_breakdown, compute,
};
pub use models::*;
