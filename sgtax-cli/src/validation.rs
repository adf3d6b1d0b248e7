//! Input rules applied before anything reaches the engine.
//!
//! Rules:
//! - income is required, non-negative and below 10,000,000
//! - CPF cash top-up is non-negative and at most the citizenship's CPF cap
//! - foreigners cannot claim a CPF cash top-up
//! - SRS contribution is non-negative and at most the citizenship's SRS cap
//!
//! Every violated rule is reported, not just the first.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sgtax_core::{CitizenshipCategory, PayerCategory, ReliefInputs};
use sgtax_data::TaxSubmission;
use thiserror::Error;

/// Incomes at or above this are rejected.
pub const INCOME_LIMIT: Decimal = dec!(10000000);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("income is required")]
    MissingIncome,

    #[error("income cannot be negative")]
    NegativeIncome,

    #[error("income must be less than {limit}")]
    IncomeTooLarge { limit: Decimal },

    #[error("CPF cash top-up cannot be negative")]
    NegativeCpfTopUp,

    #[error("foreigners are not eligible for CPF cash top-up relief")]
    CpfNotEligible,

    #[error("CPF cash top-up cannot exceed {cap}")]
    CpfTopUpOverCap { cap: Decimal },

    #[error("SRS contribution cannot be negative")]
    NegativeSrs,

    #[error("SRS contribution cannot exceed {cap} for {citizenship}")]
    SrsOverCap {
        cap: Decimal,
        citizenship: CitizenshipCategory,
    },
}

/// All violations found in one input, in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl fmt::Display for ValidationErrors {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Values collected from the command line, before validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaxForm {
    pub income: Option<Decimal>,
    pub payer: PayerCategory,
    pub citizenship: CitizenshipCategory,
    pub cpf_top_up: Decimal,
    pub srs_contribution: Decimal,
}

impl TaxForm {
    /// Checks every rule and returns the submission when all pass.
    pub fn validate_for_submit(&self) -> Result<TaxSubmission, ValidationErrors> {
        let mut errors = Vec::new();

        match self.income {
            None => errors.push(ValidationError::MissingIncome),
            Some(income) => check_income(income, &mut errors),
        }
        check_relief(
            self.cpf_top_up,
            self.srs_contribution,
            self.citizenship,
            &mut errors,
        );

        match self.income {
            Some(income) if errors.is_empty() => Ok(TaxSubmission::new(
                income,
                self.payer,
                self.citizenship,
            )
            .with_relief(ReliefInputs::new(self.cpf_top_up, self.srs_contribution))),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

/// Applies the form rules to a submission that was loaded rather than typed.
pub fn validate_submission(submission: &TaxSubmission) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    check_income(submission.gross_income, &mut errors);
    check_relief(
        submission.relief.cpf_top_up,
        submission.relief.srs_contribution,
        submission.citizenship,
        &mut errors,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

fn check_income(
    income: Decimal,
    errors: &mut Vec<ValidationError>,
) {
    if income < Decimal::ZERO {
        errors.push(ValidationError::NegativeIncome);
    } else if income >= INCOME_LIMIT {
        errors.push(ValidationError::IncomeTooLarge {
            limit: INCOME_LIMIT,
        });
    }
}

fn check_relief(
    cpf_top_up: Decimal,
    srs_contribution: Decimal,
    citizenship: CitizenshipCategory,
    errors: &mut Vec<ValidationError>,
) {
    if cpf_top_up < Decimal::ZERO {
        errors.push(ValidationError::NegativeCpfTopUp);
    } else if citizenship == CitizenshipCategory::Foreigner && cpf_top_up > Decimal::ZERO {
        errors.push(ValidationError::CpfNotEligible);
    } else if cpf_top_up > citizenship.cpf_cap() {
        errors.push(ValidationError::CpfTopUpOverCap {
            cap: citizenship.cpf_cap(),
        });
    }

    if srs_contribution < Decimal::ZERO {
        errors.push(ValidationError::NegativeSrs);
    } else if srs_contribution > citizenship.srs_cap() {
        errors.push(ValidationError::SrsOverCap {
            cap: citizenship.srs_cap(),
            citizenship,
        });
    }
}
