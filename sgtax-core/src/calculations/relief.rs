//! Relief optimisation: how much more tax could unused relief save?
//!
//! Two reliefs are modelled, CPF cash top-ups and SRS contributions, each
//! capped by citizenship:
//!
//! | Citizenship | CPF cap | SRS cap | Combined |
//! |-------------|---------|---------|----------|
//! | Resident    | 16,000  | 15,300  | 31,300   |
//! | Foreigner   | 0       | 35,700  | 35,700   |
//!
//! The analysis always reports remaining capacity, the over-limit flags and
//! the projected savings. Its [`ReliefOutcome`] then says whether there is
//! anything to suggest:
//!
//! - taxable income within the zero-rate band: nothing to save;
//! - no projected savings: relief is already maximised;
//! - otherwise an opportunity, with the bracket the taxpayer would land in.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use sgtax_core::{CitizenshipCategory, ReliefInputs, ReliefOutcome, analyze_relief};
//!
//! let analysis = analyze_relief(
//!     dec!(165000),
//!     ReliefInputs::new(dec!(0), dec!(4000)),
//!     CitizenshipCategory::Resident,
//! );
//!
//! assert_eq!(analysis.taxable_income, dec!(161000));
//! assert_eq!(analysis.remaining_srs_capacity, dec!(11300));
//!
//! let ReliefOutcome::Opportunity(opportunity) = &analysis.outcome else {
//!     panic!("expected an opportunity");
//! };
//! assert!(opportunity.reaches_lower_bracket);
//! assert_eq!(opportunity.relief_to_lower_bracket, dec!(1000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::TaxEngine;
use crate::calculations::common::non_negative;
use crate::{CitizenshipCategory, PayerCategory, ReliefInputs, TaxBracket};

/// Which caps the claimed relief exceeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverLimit {
    pub cpf: bool,
    pub srs: bool,
    pub combined: bool,
}

impl OverLimit {
    pub fn any(&self) -> bool {
        self.cpf || self.srs || self.combined
    }
}

/// Why no suggestion is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoSuggestionReason {
    /// Taxable income already sits in the zero-rate band.
    ZeroRateBand,
    /// Using the remaining capacity would not reduce tax.
    AlreadyMaximized,
}

/// Details of an achievable saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliefOpportunity {
    /// Bracket containing the current taxable income.
    pub current_bracket: TaxBracket,
    /// Bracket containing the taxable income after using all capacity.
    pub potential_bracket: TaxBracket,
    /// True when `potential_bracket` has a strictly lower rate.
    pub reaches_lower_bracket: bool,
    /// Additional relief needed to drop out of `current_bracket`.
    pub relief_to_lower_bracket: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReliefOutcome {
    NoSuggestion(NoSuggestionReason),
    Opportunity(ReliefOpportunity),
}

/// Full result of a relief analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliefAnalysis {
    pub citizenship: CitizenshipCategory,
    pub gross_income: Decimal,
    pub total_relief: Decimal,
    pub taxable_income: Decimal,
    pub remaining_cpf_capacity: Decimal,
    pub remaining_srs_capacity: Decimal,
    pub over_limit: OverLimit,
    pub current_tax: Decimal,
    pub potential_taxable_income: Decimal,
    pub potential_tax: Decimal,
    pub additional_savings: Decimal,
    pub outcome: ReliefOutcome,
}

impl ReliefAnalysis {
    pub fn remaining_total_capacity(&self) -> Decimal {
        self.remaining_cpf_capacity + self.remaining_srs_capacity
    }

    /// The opportunity, if the outcome carries one.
    pub fn suggestion(&self) -> Option<&ReliefOpportunity> {
        match &self.outcome {
            ReliefOutcome::Opportunity(opportunity) => Some(opportunity),
            ReliefOutcome::NoSuggestion(_) => None,
        }
    }

    pub fn is_maximized(&self) -> bool {
        self.outcome == ReliefOutcome::NoSuggestion(NoSuggestionReason::AlreadyMaximized)
    }
}

/// Relief analysis over a given tax engine.
#[derive(Debug, Clone, Copy)]
pub struct ReliefOptimizer<'a> {
    engine: TaxEngine<'a>,
}

impl Default for ReliefOptimizer<'static> {
    fn default() -> Self {
        Self::new(TaxEngine::standard())
    }
}

impl<'a> ReliefOptimizer<'a> {
    pub fn new(engine: TaxEngine<'a>) -> Self {
        Self { engine }
    }

    /// Analyses the relief claimed against `gross_income`.
    ///
    /// Projections use the individual (progressive) schedule.
    pub fn analyze(
        &self,
        gross_income: Decimal,
        relief: ReliefInputs,
        citizenship: CitizenshipCategory,
    ) -> ReliefAnalysis {
        let cpf_cap = citizenship.cpf_cap();
        let srs_cap = citizenship.srs_cap();

        let remaining_cpf_capacity = non_negative(cpf_cap - relief.cpf_top_up);
        let remaining_srs_capacity = non_negative(srs_cap - relief.srs_contribution);
        let remaining_total_capacity = remaining_cpf_capacity + remaining_srs_capacity;

        let total_relief = relief.total();
        let taxable_income = non_negative(gross_income - total_relief);

        let over_limit = OverLimit {
            cpf: relief.cpf_top_up > cpf_cap,
            srs: relief.srs_contribution > srs_cap,
            combined: total_relief > citizenship.total_relief_cap(),
        };

        let current_tax = self
            .engine
            .calculate_tax(taxable_income, PayerCategory::Employee);
        let potential_taxable_income = non_negative(taxable_income - remaining_total_capacity);
        let potential_tax = self
            .engine
            .calculate_tax(potential_taxable_income, PayerCategory::Employee);
        let additional_savings = current_tax - potential_tax;

        let outcome = if taxable_income <= self.engine.zero_rate_ceiling() {
            ReliefOutcome::NoSuggestion(NoSuggestionReason::ZeroRateBand)
        } else if additional_savings <= Decimal::ZERO {
            ReliefOutcome::NoSuggestion(NoSuggestionReason::AlreadyMaximized)
        } else {
            ReliefOutcome::Opportunity(self.opportunity(taxable_income, potential_taxable_income))
        };

        debug!(
            %citizenship,
            %taxable_income,
            %remaining_total_capacity,
            %additional_savings,
            over_limit = over_limit.any(),
            ?outcome,
            "relief analysed"
        );

        ReliefAnalysis {
            citizenship,
            gross_income,
            total_relief,
            taxable_income,
            remaining_cpf_capacity,
            remaining_srs_capacity,
            over_limit,
            current_tax,
            potential_taxable_income,
            potential_tax,
            additional_savings,
            outcome,
        }
    }

    fn opportunity(
        &self,
        taxable_income: Decimal,
        potential_taxable_income: Decimal,
    ) -> ReliefOpportunity {
        let current_bracket = self.engine.bracket_for(taxable_income);
        let potential_bracket = self.engine.bracket_for(potential_taxable_income);

        ReliefOpportunity {
            current_bracket,
            potential_bracket,
            reaches_lower_bracket: potential_bracket.tax_rate < current_bracket.tax_rate,
            relief_to_lower_bracket: taxable_income - current_bracket.lower_threshold(),
        }
    }
}

/// Relief analysis under the standard schedule.
pub fn analyze_relief(
    gross_income: Decimal,
    relief: ReliefInputs,
    citizenship: CitizenshipCategory,
) -> ReliefAnalysis {
    ReliefOptimizer::default().analyze(gross_income, relief, citizenship)
}
