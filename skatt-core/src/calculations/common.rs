//! Common utility functions for the calculators.
//!
//! Percentage arithmetic, the clamped gross-up used to turn a net amount back
//! into salary, the employer-contribution rules shared by the hourly-rate and
//! dividend calculators, and rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Percentage points removed from the employer contribution under regional support.
pub const REGIONAL_SUPPORT_RATE_CUT: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Monthly cap on the regional-support deduction, SEK.
pub const REGIONAL_SUPPORT_MONTHLY_CAP: Decimal = Decimal::from_parts(7100, 0, 0, false, 0);

/// Share of monthly gross salary deducted under regional support (10 %).
const REGIONAL_SUPPORT_SALARY_SHARE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Highest tax rate used when grossing up, so the divisor never reaches zero.
const MAX_GROSS_UP_RATE: Decimal = Decimal::from_parts(9999, 0, 0, false, 2);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use skatt_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to whole kronor, half away from zero.
pub fn round_to_krona(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `rate` percent of `amount`, saturating at the bounds of
/// [`Decimal`] instead of overflowing.
pub fn percent_of(
    amount: Decimal,
    rate: Decimal,
) -> Decimal {
    match amount.checked_mul(rate) {
        Some(product) => product / Decimal::ONE_HUNDRED,
        None => (amount / Decimal::ONE_HUNDRED).saturating_mul(rate),
    }
}

/// Divides `numerator` by a non-zero `denominator`, saturating at the bounds
/// of [`Decimal`] when the quotient is too large to represent.
pub fn saturating_div(
    numerator: Decimal,
    denominator: Decimal,
) -> Decimal {
    numerator.checked_div(denominator).unwrap_or({
        if numerator.is_sign_negative() != denominator.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

/// Clamps negative values to zero.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Salary needed before tax for `net` to remain after a flat `tax_rate`.
///
/// The rate is clamped to `[0, 99.99]` percent. A non-positive divisor yields
/// zero instead of an infinite amount.
///
/// ```
/// use rust_decimal_macros::dec;
/// use skatt_core::calculations::common::gross_up;
///
/// assert_eq!(gross_up(dec!(6800), dec!(32)), dec!(10000));
/// ```
pub fn gross_up(
    net: Decimal,
    tax_rate: Decimal,
) -> Decimal {
    let clamped = non_negative(tax_rate).min(MAX_GROSS_UP_RATE);
    let factor = Decimal::ONE - clamped / Decimal::ONE_HUNDRED;
    if factor <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    saturating_div(net, factor)
}

/// Employer contribution rate after regional support, floored at zero.
pub fn effective_employer_rate(
    base_rate: Decimal,
    regional_support: bool,
) -> Decimal {
    if regional_support {
        non_negative(base_rate - REGIONAL_SUPPORT_RATE_CUT)
    } else {
        base_rate
    }
}

/// Monthly regional-support deduction: 10 % of gross salary, capped at 7 100 SEK.
pub fn regional_support_deduction(gross_salary_monthly: Decimal) -> Decimal {
    (non_negative(gross_salary_monthly) * REGIONAL_SUPPORT_SALARY_SHARE)
        .min(REGIONAL_SUPPORT_MONTHLY_CAP)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // rounding tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(44117.645)), dec!(44117.65));
    }

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(44117.644)), dec!(44117.64));
    }

    #[test]
    fn round_to_krona_rounds_half_away_from_zero() {
        assert_eq!(round_to_krona(dec!(3029.5)), dec!(3030));
        assert_eq!(round_to_krona(dec!(3029.49)), dec!(3029));
    }

    // =========================================================================
    // percentage tests
    // =========================================================================

    #[test]
    fn percent_of_scales_by_hundred() {
        assert_eq!(percent_of(dec!(600000), dec!(31.42)), dec!(188520));
    }

    #[test]
    fn percent_of_saturates_on_huge_amounts() {
        assert_eq!(percent_of(Decimal::MAX, dec!(100)), Decimal::MAX);
        assert_eq!(percent_of(Decimal::MAX, dec!(250)), Decimal::MAX);
    }

    #[test]
    fn saturating_div_caps_at_decimal_bounds() {
        assert_eq!(saturating_div(dec!(10), dec!(4)), dec!(2.5));
        assert_eq!(saturating_div(Decimal::MAX, dec!(0.001)), Decimal::MAX);
        assert_eq!(saturating_div(Decimal::MIN, dec!(0.001)), Decimal::MIN);
    }

    #[test]
    fn non_negative_clamps_negative_to_zero() {
        assert_eq!(non_negative(dec!(-0.01)), Decimal::ZERO);
        assert_eq!(non_negative(dec!(12.5)), dec!(12.5));
    }

    // =========================================================================
    // gross_up tests
    // =========================================================================

    #[test]
    fn gross_up_inverts_flat_tax() {
        assert_eq!(gross_up(dec!(6800), dec!(32)), dec!(10000));
    }

    #[test]
    fn gross_up_with_zero_rate_is_identity() {
        assert_eq!(gross_up(dec!(30000), Decimal::ZERO), dec!(30000));
    }

    #[test]
    fn gross_up_clamps_rate_at_or_above_hundred() {
        assert_eq!(gross_up(dec!(1), dec!(100)), dec!(10000));
        assert_eq!(gross_up(dec!(1), dec!(250)), dec!(10000));
    }

    #[test]
    fn gross_up_treats_negative_rate_as_zero() {
        assert_eq!(gross_up(dec!(500), dec!(-5)), dec!(500));
    }

    // =========================================================================
    // employer contribution tests
    // =========================================================================

    #[test]
    fn effective_employer_rate_without_support_is_unchanged() {
        assert_eq!(effective_employer_rate(dec!(31.42), false), dec!(31.42));
    }

    #[test]
    fn effective_employer_rate_cuts_ten_points() {
        assert_eq!(effective_employer_rate(dec!(31.42), true), dec!(21.42));
    }

    #[test]
    fn effective_employer_rate_floors_at_zero() {
        assert_eq!(effective_employer_rate(dec!(4), true), Decimal::ZERO);
    }

    #[test]
    fn regional_support_deduction_is_ten_percent_below_cap() {
        assert_eq!(regional_support_deduction(dec!(50000)), dec!(5000));
    }

    #[test]
    fn regional_support_deduction_is_capped() {
        assert_eq!(regional_support_deduction(dec!(90000)), dec!(7100));
    }
}
