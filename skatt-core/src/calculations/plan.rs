//! Multi-year planning: runs [`calculate_year`] over an ordered list of years.
//!
//! Year `i` depends on year `i - 1` through closing equity and saved dividend
//! allowance, so years are computed strictly in order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::dividend::calculate_year;
use crate::models::{GlobalSettings, YearCalculation, YearInput};

/// Calculates every year of the plan, threading each result into the next.
///
/// The output has one entry per input, and `result[i].year_number == i + 1`.
///
/// # Example
///
/// ```
/// use skatt_core::{GlobalSettings, YearInput};
/// use skatt_core::calculations::calculate_all_years;
///
/// let settings = GlobalSettings::default();
/// let inputs = vec![YearInput::default(); 3];
///
/// let years = calculate_all_years(&inputs, &settings);
///
/// assert_eq!(years.len(), 3);
/// assert_eq!(years[1].opening_equity, years[0].closing_equity);
/// ```
pub fn calculate_all_years(
    inputs: &[YearInput],
    settings: &GlobalSettings,
) -> Vec<YearCalculation> {
    debug!(years = inputs.len(), "calculating plan");

    inputs
        .iter()
        .zip(1u32..)
        .fold(Vec::with_capacity(inputs.len()), |mut years, (input, year_number)| {
            let year = calculate_year(input, settings, years.last(), year_number);
            years.push(year);
            years
        })
}

/// Resizes `inputs` to exactly `number_of_years` entries.
///
/// Extra entries are dropped. Missing entries repeat the last given year, or
/// use [`YearInput::default`] when no year was given at all.
pub fn align_year_inputs(
    mut inputs: Vec<YearInput>,
    number_of_years: usize,
) -> Vec<YearInput> {
    if inputs.len() > number_of_years {
        warn!(
            given = inputs.len(),
            number_of_years, "more year inputs than planned years; dropping the rest"
        );
        inputs.truncate(number_of_years);
        return inputs;
    }

    let template = inputs.last().cloned().unwrap_or_default();
    inputs.resize(number_of_years, template);
    inputs
}

/// Totals across a calculated plan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanSummary {
    pub years: usize,
    pub total_net_salary: Decimal,
    pub total_net_dividend: Decimal,
    pub total_net_to_owner: Decimal,
    pub total_corporate_tax: Decimal,
    /// Closing equity of the last year.
    pub final_equity: Decimal,
    /// Allowance left unused after the last year, before uplift.
    pub final_saved_allowance: Decimal,
}

impl PlanSummary {
    pub fn from_years(years: &[YearCalculation]) -> Self {
        let total = |field: fn(&YearCalculation) -> Decimal| {
            years
                .iter()
                .map(field)
                .fold(Decimal::ZERO, Decimal::saturating_add)
        };
        let total_net_salary = total(|y| y.net_salary_yearly);
        let total_net_dividend = total(|y| y.net_dividend);

        Self {
            years: years.len(),
            total_net_salary,
            total_net_dividend,
            total_net_to_owner: total_net_salary.saturating_add(total_net_dividend),
            total_corporate_tax: total(|y| y.corporate_tax_yearly),
            final_equity: years.last().map(|y| y.closing_equity).unwrap_or(Decimal::ZERO),
            final_saved_allowance: years
                .last()
                .map(|y| y.saved_dividend_allowance)
                .unwrap_or(Decimal::ZERO),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    fn three_year_plan() -> Vec<YearInput> {
        [dec!(5), dec!(10), dec!(15)]
            .into_iter()
            .map(|dividend_percent| YearInput {
                dividend_percent,
                ..YearInput::default()
            })
            .collect()
    }

    fn settings_with_equity() -> GlobalSettings {
        GlobalSettings {
            opening_free_equity: dec!(250000),
            ..GlobalSettings::default()
        }
    }

    // =========================================================================
    // calculate_all_years tests
    // =========================================================================

    #[test]
    fn empty_plan_gives_no_years() {
        let years = calculate_all_years(&[], &GlobalSettings::default());

        assert!(years.is_empty());
    }

    #[test]
    fn years_are_numbered_from_one() {
        let years = calculate_all_years(&three_year_plan(), &GlobalSettings::default());

        let numbers: Vec<u32> = years.iter().map(|y| y.year_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn first_year_opens_with_settings_equity() {
        let years = calculate_all_years(&three_year_plan(), &settings_with_equity());

        assert_eq!(years[0].opening_equity, dec!(250000));
    }

    #[test]
    fn equity_is_conserved_between_years() {
        let years = calculate_all_years(&three_year_plan(), &settings_with_equity());

        for pair in years.windows(2) {
            assert_eq!(pair[1].opening_equity, pair[0].closing_equity);
        }
    }

    #[test]
    fn saved_allowance_is_uplifted_into_next_year() {
        let settings = settings_with_equity();
        let years = calculate_all_years(&three_year_plan(), &settings);

        for pair in years.windows(2) {
            assert_eq!(
                pair[1].carried_forward_allowance,
                pair[0].saved_dividend_allowance * settings.rules.carry_forward_factor()
            );
        }
    }

    #[test]
    fn plan_matches_manual_threading() {
        let settings = settings_with_equity();
        let inputs = three_year_plan();

        let years = calculate_all_years(&inputs, &settings);

        let first = calculate_year(&inputs[0], &settings, None, 1);
        let second = calculate_year(&inputs[1], &settings, Some(&first), 2);
        let third = calculate_year(&inputs[2], &settings, Some(&second), 3);
        assert_eq!(years, vec![first, second, third]);
    }

    #[test]
    fn money_fields_are_non_negative_across_plan() {
        let inputs = vec![
            YearInput {
                hourly_rate: dec!(200),
                dividend_percent: dec!(100),
                ..YearInput::default()
            },
            YearInput {
                dividend_percent: dec!(100),
                ..YearInput::default()
            },
        ];

        for year in calculate_all_years(&inputs, &settings_with_equity()) {
            assert!(year.net_salary_yearly >= Decimal::ZERO);
            assert!(year.gross_dividend >= Decimal::ZERO);
            assert!(year.net_dividend >= Decimal::ZERO);
            assert!(year.closing_equity >= Decimal::ZERO);
            assert!(year.saved_dividend_allowance >= Decimal::ZERO);
            assert!(year.max_dividend_by_equity >= Decimal::ZERO);
            assert_eq!(
                year.low_tax_dividend + year.high_tax_dividend,
                year.gross_dividend
            );
        }
    }

    // =========================================================================
    // align_year_inputs tests
    // =========================================================================

    #[test]
    fn align_truncates_extra_years() {
        let _guard = init_test_tracing();
        let aligned = align_year_inputs(three_year_plan(), 2);

        assert_eq!(aligned.len(), 2);
        assert_eq!(aligned[1].dividend_percent, dec!(10));
    }

    #[test]
    fn align_repeats_last_year() {
        let aligned = align_year_inputs(three_year_plan(), 5);

        assert_eq!(aligned.len(), 5);
        assert_eq!(aligned[3].dividend_percent, dec!(15));
        assert_eq!(aligned[4].dividend_percent, dec!(15));
    }

    #[test]
    fn align_empty_uses_defaults() {
        let aligned = align_year_inputs(Vec::new(), 2);

        assert_eq!(aligned, vec![YearInput::default(); 2]);
    }

    // =========================================================================
    // PlanSummary tests
    // =========================================================================

    #[test]
    fn summary_of_empty_plan_is_zero() {
        assert_eq!(PlanSummary::from_years(&[]), PlanSummary::default());
    }

    #[test]
    fn summary_of_saturated_years_does_not_overflow() {
        let input = YearInput {
            gross_salary_monthly: Decimal::MAX,
            ..YearInput::default()
        };
        let years = calculate_all_years(&[input.clone(), input], &GlobalSettings::default());

        let summary = PlanSummary::from_years(&years);

        assert_eq!(summary.years, 2);
        assert_eq!(summary.total_net_salary, Decimal::MAX);
    }

    #[test]
    fn summary_totals_owner_income() {
        let years = calculate_all_years(&three_year_plan(), &settings_with_equity());

        let summary = PlanSummary::from_years(&years);

        assert_eq!(summary.years, 3);
        assert_eq!(summary.total_net_salary, dec!(1224000));
        assert_eq!(
            summary.total_net_to_owner,
            summary.total_net_salary + summary.total_net_dividend
        );
        assert_eq!(summary.final_equity, years[2].closing_equity);
    }
}
