//! Progressive and flat-rate tax computation.
//!
//! Individuals (employees and sole proprietors) are taxed by walking the
//! bracket schedule from the bottom: each bracket absorbs as much of the
//! remaining income as its width allows and taxes it at its own rate, and
//! the unbounded top bracket absorbs whatever is left. Corporations pay a
//! single flat rate on the whole amount.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use sgtax_core::{PayerCategory, calculate_tax, calculate_tax_breakdown};
//!
//! let tax = calculate_tax(dec!(161000), PayerCategory::Employee);
//! assert_eq!(tax, dec!(14130));
//!
//! let breakdown = calculate_tax_breakdown(dec!(161000), PayerCategory::Employee);
//! assert_eq!(breakdown.len(), 7);
//! assert_eq!(breakdown[6].bracket.tax_rate, dec!(0.18));
//! assert_eq!(breakdown[6].taxable_amount, dec!(1000));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use crate::brackets::{CORPORATE_TAX_RATE, PROGRESSIVE_TAX_BRACKETS, corporate_bracket};
use crate::calculations::common::non_negative;
use crate::{BracketContribution, PayerCategory, TaxBracket, TaxComputationResult};

/// Errors raised when a bracket schedule is not well formed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxEngineError {
    #[error("no tax brackets provided")]
    NoTaxBrackets,

    #[error("first bracket must start at zero, got {0}")]
    FirstBracketNotZero(Decimal),

    #[error("bracket {index} starts at {min_income}, expected {expected}")]
    NotContiguous {
        index: usize,
        min_income: Decimal,
        expected: Decimal,
    },

    #[error("bracket {0} ends below where it starts")]
    InvertedBracket(usize),

    #[error("only the last bracket may be unbounded, but bracket {0} is")]
    UnboundedBeforeTop(usize),

    #[error("the last bracket must be unbounded")]
    BoundedTop,

    #[error("tax rate must be between 0 and 1, got {0}")]
    InvalidRate(Decimal),
}

/// Tax calculator bound to a bracket schedule and a corporate rate.
///
/// [`TaxEngine::standard`] uses the built-in schedule; the module-level
/// functions are shorthands for it.
#[derive(Debug, Clone, Copy)]
pub struct TaxEngine<'a> {
    tax_brackets: &'a [TaxBracket],
    corporate_rate: Decimal,
}

impl TaxEngine<'static> {
    pub fn standard() -> Self {
        Self {
            tax_brackets: &PROGRESSIVE_TAX_BRACKETS,
            corporate_rate: CORPORATE_TAX_RATE,
        }
    }
}

impl Default for TaxEngine<'static> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a> TaxEngine<'a> {
    /// Creates an engine over a custom schedule.
    ///
    /// Brackets must be sorted ascending, start at zero, be contiguous on
    /// whole-dollar thresholds (`next.min == prev.max + 1`), and end with a
    /// single unbounded bracket.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError`] describing the first violation found.
    pub fn new(
        tax_brackets: &'a [TaxBracket],
        corporate_rate: Decimal,
    ) -> Result<Self, TaxEngineError> {
        validate_rate(corporate_rate)?;

        let (first, last) = match (tax_brackets.first(), tax_brackets.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(TaxEngineError::NoTaxBrackets),
        };
        if !first.min_income.is_zero() {
            return Err(TaxEngineError::FirstBracketNotZero(first.min_income));
        }
        if !last.is_unbounded() {
            return Err(TaxEngineError::BoundedTop);
        }

        for (index, bracket) in tax_brackets.iter().enumerate() {
            validate_rate(bracket.tax_rate)?;

            if index + 1 < tax_brackets.len() && bracket.is_unbounded() {
                return Err(TaxEngineError::UnboundedBeforeTop(index));
            }
            if bracket.width().is_some_and(|width| width < Decimal::ONE) {
                return Err(TaxEngineError::InvertedBracket(index));
            }
        }

        for (index, pair) in tax_brackets.windows(2).enumerate() {
            let expected = pair[0].max_income.unwrap_or(Decimal::ZERO) + Decimal::ONE;
            if pair[1].min_income != expected {
                return Err(TaxEngineError::NotContiguous {
                    index: index + 1,
                    min_income: pair[1].min_income,
                    expected,
                });
            }
        }

        Ok(Self {
            tax_brackets,
            corporate_rate,
        })
    }

    pub fn brackets(&self) -> &'a [TaxBracket] {
        self.tax_brackets
    }

    pub fn corporate_rate(&self) -> Decimal {
        self.corporate_rate
    }

    /// Total tax owed on `taxable_income`.
    ///
    /// Negative income is a caller error; it is treated as zero.
    pub fn calculate_tax(
        &self,
        taxable_income: Decimal,
        category: PayerCategory,
    ) -> Decimal {
        let taxable_income = non_negative(taxable_income);

        if category.is_progressive() {
            self.progressive_contributions(taxable_income)
                .iter()
                .map(|c| c.tax_for_bracket)
                .sum()
        } else {
            taxable_income * self.corporate_rate
        }
    }

    /// Per-bracket contributions in ascending bracket order.
    ///
    /// Only brackets that received income appear. Corporations get a single
    /// synthetic bracket covering the whole amount at the flat rate.
    pub fn calculate_tax_breakdown(
        &self,
        taxable_income: Decimal,
        category: PayerCategory,
    ) -> Vec<BracketContribution> {
        let taxable_income = non_negative(taxable_income);

        if category.is_progressive() {
            self.progressive_contributions(taxable_income)
        } else {
            let bracket = TaxBracket {
                tax_rate: self.corporate_rate,
                ..corporate_bracket()
            };
            vec![BracketContribution::new(bracket, taxable_income)]
        }
    }

    /// Total and breakdown from a single bracket walk.
    pub fn compute(
        &self,
        taxable_income: Decimal,
        category: PayerCategory,
    ) -> TaxComputationResult {
        let breakdown = self.calculate_tax_breakdown(taxable_income, category);
        let total_tax = breakdown.iter().map(|c| c.tax_for_bracket).sum();

        TaxComputationResult {
            total_tax,
            breakdown,
        }
    }

    /// The bracket whose range contains `taxable_income`.
    ///
    /// This is the first bracket whose ceiling is at or above the income,
    /// or the top bracket once every ceiling has been passed.
    pub fn bracket_for(
        &self,
        taxable_income: Decimal,
    ) -> TaxBracket {
        let top = self.tax_brackets[self.tax_brackets.len() - 1];

        self.tax_brackets
            .iter()
            .find(|b| b.reaches(taxable_income))
            .copied()
            .unwrap_or(top)
    }

    /// Rate applied to the next dollar of income.
    pub fn marginal_rate(
        &self,
        taxable_income: Decimal,
        category: PayerCategory,
    ) -> Decimal {
        if category.is_progressive() {
            self.bracket_for(taxable_income).tax_rate
        } else {
            self.corporate_rate
        }
    }

    /// Total tax as a fraction of `taxable_income`; zero when there is no income.
    pub fn effective_rate(
        &self,
        taxable_income: Decimal,
        category: PayerCategory,
    ) -> Decimal {
        if taxable_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.calculate_tax(taxable_income, category) / taxable_income
    }

    /// Highest income that is still taxed at zero.
    pub fn zero_rate_ceiling(&self) -> Decimal {
        self.tax_brackets
            .iter()
            .take_while(|b| b.tax_rate.is_zero())
            .last()
            .and_then(|b| b.max_income)
            .unwrap_or(Decimal::ZERO)
    }

    fn progressive_contributions(
        &self,
        taxable_income: Decimal,
    ) -> Vec<BracketContribution> {
        let mut contributions = Vec::with_capacity(self.tax_brackets.len());
        let mut remaining = taxable_income;

        for bracket in self.tax_brackets {
            if remaining <= Decimal::ZERO {
                break;
            }

            let taxable_in_bracket = match bracket.width() {
                Some(width) => remaining.min(width),
                None => remaining,
            };

            if taxable_in_bracket > Decimal::ZERO {
                contributions.push(BracketContribution::new(*bracket, taxable_in_bracket));
            }
            remaining -= taxable_in_bracket;
        }

        contributions
    }
}

fn validate_rate(rate: Decimal) -> Result<(), TaxEngineError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(TaxEngineError::InvalidRate(rate));
    }
    Ok(())
}

/// Tax owed under the standard schedule.
pub fn calculate_tax(
    taxable_income: Decimal,
    category: PayerCategory,
) -> Decimal {
    TaxEngine::standard().calculate_tax(taxable_income, category)
}

/// Per-bracket breakdown under the standard schedule.
pub fn calculate_tax_breakdown(
    taxable_income: Decimal,
    category: PayerCategory,
) -> Vec<BracketContribution> {
    TaxEngine::standard().calculate_tax_breakdown(taxable_income, category)
}

/// Total and breakdown under the standard schedule.
pub fn compute(
    taxable_income: Decimal,
    category: PayerCategory,
) -> TaxComputationResult {
    TaxEngine::standard().compute(taxable_income, category)
}
