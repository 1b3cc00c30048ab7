//! Two-tier occupational pension premium (ITP1-style).
//!
//! Salary up to 7.5 income base amounts per year earns the lower premium;
//! salary above it earns the higher premium.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{non_negative, percent_of};

/// Income base amounts per year below which the lower premium applies.
pub const PENSION_THRESHOLD_IBB_MULTIPLIER: Decimal = Decimal::from_parts(75, 0, 0, false, 1);

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PensionInput {
    pub monthly_salary: Decimal,
    pub ibb: Decimal,
    /// Premium on salary up to the threshold, percent.
    pub lower_rate: Decimal,
    /// Premium on salary above the threshold, percent.
    pub higher_rate: Decimal,
}

impl Default for PensionInput {
    fn default() -> Self {
        Self {
            monthly_salary: Decimal::from(50_000),
            ibb: Decimal::from(80_600),
            lower_rate: Decimal::new(45, 1),
            higher_rate: Decimal::from(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionResult {
    /// Monthly salary at which the higher premium starts.
    pub monthly_threshold: Decimal,
    pub salary_up_to_threshold: Decimal,
    pub salary_above_threshold: Decimal,
    pub lower_part: Decimal,
    pub higher_part: Decimal,
    pub total_monthly: Decimal,
    pub total_yearly: Decimal,
    pub percentage_of_salary: Decimal,
}

pub fn calculate_pension(input: &PensionInput) -> PensionResult {
    debug!(
        monthly_salary = %input.monthly_salary,
        ibb = %input.ibb,
        "calculating occupational pension"
    );

    let monthly_threshold =
        non_negative(input.ibb) * PENSION_THRESHOLD_IBB_MULTIPLIER / MONTHS_PER_YEAR;
    let salary = non_negative(input.monthly_salary);

    let salary_up_to_threshold = salary.min(monthly_threshold);
    let salary_above_threshold = non_negative(salary - monthly_threshold);

    let lower_part = percent_of(salary_up_to_threshold, input.lower_rate);
    let higher_part = percent_of(salary_above_threshold, input.higher_rate);
    let total_monthly = lower_part + higher_part;

    let percentage_of_salary = if salary > Decimal::ZERO {
        total_monthly / salary * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    PensionResult {
        monthly_threshold,
        salary_up_to_threshold,
        salary_above_threshold,
        lower_part,
        higher_part,
        total_monthly,
        total_yearly: total_monthly * MONTHS_PER_YEAR,
        percentage_of_salary,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn input(monthly_salary: Decimal) -> PensionInput {
        PensionInput {
            monthly_salary,
            ibb: dec!(80000),
            lower_rate: dec!(4.5),
            higher_rate: dec!(30),
        }
    }

    #[test]
    fn salary_below_threshold_uses_lower_rate_only() {
        let result = calculate_pension(&input(dec!(40000)));

        assert_eq!(result.monthly_threshold, dec!(50000));
        assert_eq!(result.higher_part, Decimal::ZERO);
        assert_eq!(result.total_monthly, dec!(1800));
        assert_eq!(result.total_yearly, dec!(21600));
        assert_eq!(result.percentage_of_salary, dec!(4.5));
    }

    #[test]
    fn salary_above_threshold_splits_between_rates() {
        let result = calculate_pension(&input(dec!(60000)));

        assert_eq!(result.salary_up_to_threshold, dec!(50000));
        assert_eq!(result.salary_above_threshold, dec!(10000));
        // 50 000 × 4.5 % + 10 000 × 30 %
        assert_eq!(result.lower_part, dec!(2250));
        assert_eq!(result.higher_part, dec!(3000));
        assert_eq!(result.total_monthly, dec!(5250));
        assert_eq!(result.percentage_of_salary, dec!(8.75));
    }

    #[test]
    fn zero_salary_gives_zero_percentage() {
        let result = calculate_pension(&input(Decimal::ZERO));

        assert_eq!(result.total_monthly, Decimal::ZERO);
        assert_eq!(result.percentage_of_salary, Decimal::ZERO);
    }

    #[test]
    fn default_rates_are_four_and_a_half_and_thirty() {
        let defaults = PensionInput::default();

        assert_eq!(defaults.lower_rate, dec!(4.5));
        assert_eq!(defaults.higher_rate, dec!(30));
    }
}
