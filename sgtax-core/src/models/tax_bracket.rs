use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A contiguous income range taxed at a single marginal rate.
///
/// `min_income` and `max_income` are whole-dollar thresholds, both inclusive.
/// The top bracket has no `max_income`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl TaxBracket {
    pub const fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            tax_rate,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_income.is_none()
    }

    /// Income at or below which this bracket does not apply.
    ///
    /// This is the previous bracket's `max_income`, or zero for the first band.
    pub fn lower_threshold(&self) -> Decimal {
        if self.min_income.is_zero() {
            Decimal::ZERO
        } else {
            self.min_income - Decimal::ONE
        }
    }

    /// Amount of income this bracket can absorb, `None` for the top bracket.
    ///
    /// Brackets above zero span `max - min + 1` dollars; the zero-based
    /// first band spans exactly `max` dollars.
    pub fn width(&self) -> Option<Decimal> {
        self.max_income.map(|max| max - self.lower_threshold())
    }

    /// Whether `income` is at or below this bracket's ceiling.
    pub fn reaches(
        &self,
        income: Decimal,
    ) -> bool {
        self.max_income.is_none_or(|max| income <= max)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn width_of_zero_based_band_is_its_ceiling() {
        let bracket = TaxBracket::new(dec!(0), Some(dec!(20000)), dec!(0));

        assert_eq!(bracket.width(), Some(dec!(20000)));
    }

    #[test]
    fn width_of_upper_band_includes_both_ends() {
        let bracket = TaxBracket::new(dec!(20001), Some(dec!(30000)), dec!(0.02));

        assert_eq!(bracket.width(), Some(dec!(10000)));
        assert_eq!(bracket.lower_threshold(), dec!(20000));
    }

    #[test]
    fn unbounded_bracket_has_no_width() {
        let bracket = TaxBracket::new(dec!(320001), None, dec!(0.22));

        assert!(bracket.is_unbounded());
        assert_eq!(bracket.width(), None);
        assert!(bracket.reaches(dec!(99999999)));
    }

    #[test]
    fn reaches_is_inclusive_of_ceiling() {
        let bracket = TaxBracket::new(dec!(160001), Some(dec!(200000)), dec!(0.18));

        assert!(bracket.reaches(dec!(200000)));
        assert!(!bracket.reaches(dec!(200000.01)));
    }
}
