use rust_decimal::Decimal;
use thiserror::Error;

use skatt_core::calculations::common::{round_half_up, round_to_krona};

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes Swedish-style input: drops spaces used as thousands separators
/// and turns a decimal comma into a point.
fn normalize_decimal_input(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}

/// Parses a string into a [`Decimal`].
///
/// Accepts `"50 000"`, `"31,42"` and `"31.42"`. Empty input is treated as 0.
/// Used as a clap value parser for every amount and rate flag.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Formats whole kronor with a space every three digits: `1 234 567 kr`.
pub fn format_sek(amount: Decimal) -> String {
    let rounded = round_to_krona(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }

    if negative {
        format!("-{grouped} kr")
    } else {
        format!("{grouped} kr")
    }
}

/// Formats a percentage with two decimals and a decimal comma: `31,42 %`.
pub fn format_percent(rate: Decimal) -> String {
    let rounded = round_half_up(rate);
    format!("{:.2} %", rounded).replace('.', ",")
}
