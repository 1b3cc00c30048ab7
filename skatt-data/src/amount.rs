//! Parsing of the loosely formatted numbers found in Skatteverket exports.
//!
//! Withholding amounts come as whole kronor, sometimes with thousands
//! separators (`"12 345"`). Rates use a decimal comma (`"20,50"`).

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parses a whole-krona amount, ignoring everything but digits and `-`.
///
/// Empty cells read as zero. Returns `None` when the remaining characters do
/// not form a number.
pub(crate) fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    parse_cleaned(&cleaned)
}

/// Parses a rate or price that may carry decimals, with `.` or `,` as the
/// decimal separator.
pub(crate) fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter_map(|c| match c {
            ',' => Some('.'),
            c if c.is_ascii_digit() || c == '.' || c == '-' => Some(c),
            _ => None,
        })
        .collect();
    parse_cleaned(&cleaned)
}

fn parse_cleaned(cleaned: &str) -> Option<Decimal> {
    if cleaned.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(cleaned).ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn amount_ignores_separators_and_units() {
        assert_eq!(parse_amount("12 345"), Some(dec!(12345)));
        assert_eq!(parse_amount("4 000 kr"), Some(dec!(4000)));
    }

    #[test]
    fn empty_amount_is_zero() {
        assert_eq!(parse_amount(""), Some(Decimal::ZERO));
        assert_eq!(parse_amount("  "), Some(Decimal::ZERO));
    }

    #[test]
    fn garbled_amount_is_rejected() {
        assert_eq!(parse_amount("12-34"), None);
    }

    #[test]
    fn decimal_accepts_comma_separator() {
        assert_eq!(parse_decimal("20,50"), Some(dec!(20.50)));
        assert_eq!(parse_decimal("17.74"), Some(dec!(17.74)));
    }

    #[test]
    fn decimal_with_two_separators_is_rejected() {
        assert_eq!(parse_decimal("1.234,5"), None);
    }
}
