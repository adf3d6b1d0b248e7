//! Display formatting shared by the terminal output and the CSV export.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use sgtax_core::TaxBracket;
use sgtax_core::calculations::common::round_half_up;

/// Formats an amount with thousands separators and two decimal places.
///
/// ```
/// use rust_decimal_macros::dec;
/// use sgtax_data::format::format_currency;
///
/// assert_eq!(format_currency(dec!(1234567.891)), "1,234,567.89");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

/// Formats a fractional rate as a percentage with one decimal place.
pub fn format_rate(rate: Decimal) -> String {
    let percent = (rate * dec!(100)).round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{percent:.1}%")
}

/// Human-readable income range of a bracket.
pub fn format_range(bracket: &TaxBracket) -> String {
    match bracket.max_income {
        Some(max) => format!(
            "{} - {}",
            format_currency(bracket.min_income),
            format_currency(max)
        ),
        None => format!("Above {}", format_currency(bracket.min_income)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn format_currency_groups_thousands() {
        assert_eq!(format_currency(dec!(0)), "0.00");
        assert_eq!(format_currency(dec!(999)), "999.00");
        assert_eq!(format_currency(dec!(1000)), "1,000.00");
        assert_eq!(format_currency(dec!(161000)), "161,000.00");
        assert_eq!(format_currency(dec!(1000000.5)), "1,000,000.50");
    }

    #[test]
    fn format_currency_rounds_half_up() {
        assert_eq!(format_currency(dec!(0.005)), "0.01");
        assert_eq!(format_currency(dec!(14130.004)), "14,130.00");
    }

    #[test]
    fn format_currency_keeps_sign() {
        assert_eq!(format_currency(dec!(-4125)), "-4,125.00");
    }

    #[test]
    fn format_rate_one_decimal() {
        assert_eq!(format_rate(dec!(0.035)), "3.5%");
        assert_eq!(format_rate(dec!(0.18)), "18.0%");
        assert_eq!(format_rate(dec!(0)), "0.0%");
    }

    #[test]
    fn format_range_bounded_and_top() {
        let bounded = TaxBracket::new(dec!(20001), Some(dec!(30000)), dec!(0.02));
        let top = TaxBracket::new(dec!(320001), None, dec!(0.22));

        assert_eq!(format_range(&bounded), "20,001.00 - 30,000.00");
        assert_eq!(format_range(&top), "Above 320,001.00");
    }
}
