//! Tax computations over the bracket schedule.
//!
//! [`engine`] walks the brackets to produce totals and breakdowns;
//! [`relief`] projects how much unused relief capacity could still save.

pub mod common;
pub mod engine;
pub mod relief;

pub use engine::{TaxEngine, TaxEngineError, calculate_tax, calculate_tax_breakdown, compute};
pub use relief::{
    NoSuggestionReason, OverLimit, ReliefAnalysis, ReliefOpportunity, ReliefOptimizer,
    ReliefOutcome, analyze_relief,
};
