//! The resident progressive rate schedule and the corporate flat rate.
//!
//! | Chargeable income   | Rate  |
//! |---------------------|-------|
//! | first 20,000        | 0%    |
//! | 20,001 – 30,000     | 2%    |
//! | 30,001 – 40,000     | 3.5%  |
//! | 40,001 – 80,000     | 7%    |
//! | 80,001 – 120,000    | 11.5% |
//! | 120,001 – 160,000   | 15%   |
//! | 160,001 – 200,000   | 18%   |
//! | 200,001 – 240,000   | 19%   |
//! | 240,001 – 280,000   | 19.5% |
//! | 280,001 – 320,000   | 20%   |
//! | above 320,000       | 22%   |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::TaxBracket;

pub static PROGRESSIVE_TAX_BRACKETS: [TaxBracket; 11] = [
    TaxBracket::new(dec!(0), Some(dec!(20000)), dec!(0)),
    TaxBracket::new(dec!(20001), Some(dec!(30000)), dec!(0.02)),
    TaxBracket::new(dec!(30001), Some(dec!(40000)), dec!(0.035)),
    TaxBracket::new(dec!(40001), Some(dec!(80000)), dec!(0.07)),
    TaxBracket::new(dec!(80001), Some(dec!(120000)), dec!(0.115)),
    TaxBracket::new(dec!(120001), Some(dec!(160000)), dec!(0.15)),
    TaxBracket::new(dec!(160001), Some(dec!(200000)), dec!(0.18)),
    TaxBracket::new(dec!(200001), Some(dec!(240000)), dec!(0.19)),
    TaxBracket::new(dec!(240001), Some(dec!(280000)), dec!(0.195)),
    TaxBracket::new(dec!(280001), Some(dec!(320000)), dec!(0.20)),
    TaxBracket::new(dec!(320001), None, dec!(0.22)),
];

pub const CORPORATE_TAX_RATE: Decimal = dec!(0.17);

/// The synthetic single bracket reported for corporate breakdowns.
pub const fn corporate_bracket() -> TaxBracket {
    TaxBracket::new(Decimal::ZERO, None, CORPORATE_TAX_RATE)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn schedule_is_contiguous() {
        for pair in PROGRESSIVE_TAX_BRACKETS.windows(2) {
            assert_eq!(pair[0].max_income, Some(pair[1].lower_threshold()));
        }
    }

    #[test]
    fn only_top_bracket_is_unbounded() {
        let unbounded: Vec<_> = PROGRESSIVE_TAX_BRACKETS
            .iter()
            .filter(|b| b.is_unbounded())
            .collect();

        assert_eq!(unbounded.len(), 1);
        assert_eq!(unbounded[0].min_income, dec!(320001));
        assert_eq!(unbounded[0].tax_rate, dec!(0.22));
    }

    #[test]
    fn rates_never_decrease() {
        for pair in PROGRESSIVE_TAX_BRACKETS.windows(2) {
            assert!(pair[0].tax_rate <= pair[1].tax_rate);
        }
    }
}
