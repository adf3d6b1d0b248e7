use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxBracket;

/// The share of income that fell into one bracket and the tax it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketContribution {
    pub bracket: TaxBracket,
    pub taxable_amount: Decimal,
    pub tax_for_bracket: Decimal,
}

impl BracketContribution {
    pub fn new(
        bracket: TaxBracket,
        taxable_amount: Decimal,
    ) -> Self {
        Self {
            bracket,
            taxable_amount,
            tax_for_bracket: taxable_amount * bracket.tax_rate,
        }
    }
}

/// Total tax together with its per-bracket breakdown, ascending by bracket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputationResult {
    pub total_tax: Decimal,
    pub breakdown: Vec<BracketContribution>,
}

impl TaxComputationResult {
    /// Sum of `tax_for_bracket` over the breakdown.
    pub fn breakdown_total(&self) -> Decimal {
        self.breakdown.iter().map(|c| c.tax_for_bracket).sum()
    }

    pub fn taxed_income(&self) -> Decimal {
        self.breakdown.iter().map(|c| c.taxable_amount).sum()
    }
}
