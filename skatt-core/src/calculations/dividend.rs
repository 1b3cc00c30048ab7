//! One fiscal year of an owner-operator's salary and dividend plan.
//!
//! The calculation follows the company's money from invoicing down to what
//! reaches the owner, and applies the close-company ("3:12") rules to decide
//! how much of the dividend is taxed at the low capital rate.
//!
//! # Calculation Structure
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Yearly gross salary (monthly × 12) |
//! | 2–3  | Employer contributions, with regional support if applicable |
//! | 4    | Salary tax and net salary at the settings' total tax rate |
//! | 5    | Yearly costs and invoiced revenue |
//! | 6–7  | Surplus before and after the safety buffer |
//! | 8    | Net profit after corporate tax |
//! | 9–10 | Opening equity and maximum dividend the equity allows |
//! | 11   | Dividend allowance: max(simplified rule, main rule) + uplifted carry-forward |
//! | 12   | Gross dividend at the chosen payout percentage |
//! | 13   | Split into low-tax (within allowance) and high-tax parts; net dividend |
//! | 14–15| Owner's total net per month and the equivalent gross salary |
//! | 16–17| Closing equity and unused allowance carried to next year |
//!
//! The function is pure: the same input, settings and previous year always
//! produce the same result. Negative intermediate figures are clamped so that
//! every amount that reaches the owner or the next year is non-negative, and
//! arithmetic saturates at the bounds of [`Decimal`] instead of panicking.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{
    effective_employer_rate, gross_up, non_negative, percent_of, regional_support_deduction,
    saturating_div,
};
use crate::models::{DividendRules, GlobalSettings, YearCalculation, YearInput};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Dividend allowance (gränsbelopp) for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Allowance {
    payroll_base: Decimal,
    wage_floor: Decimal,
    eligible_for_main_rule: bool,
    simplified_rule: Decimal,
    main_rule: Decimal,
    carried_forward: Decimal,
    total: Decimal,
}

/// Calculates one fiscal year of the plan.
///
/// `previous_year` is the result for year `year_number - 1`, or `None` for the
/// first year. Year 1 always opens with the settings' opening free equity;
/// later years open with the previous year's closing equity.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use skatt_core::{GlobalSettings, YearInput};
/// use skatt_core::calculations::calculate_year;
///
/// let settings = GlobalSettings::default();
/// let input = YearInput {
///     dividend_percent: dec!(0),
///     ..YearInput::default()
/// };
///
/// let year = calculate_year(&input, &settings, None, 1);
///
/// assert_eq!(year.gross_salary_yearly, dec!(600000));
/// assert_eq!(year.net_salary_yearly, dec!(408000));
/// assert_eq!(year.closing_equity, year.max_dividend_by_equity);
/// ```
pub fn calculate_year(
    input: &YearInput,
    settings: &GlobalSettings,
    previous_year: Option<&YearCalculation>,
    year_number: u32,
) -> YearCalculation {
    debug!(
        year_number,
        gross_salary_monthly = %input.gross_salary_monthly,
        dividend_percent = %input.dividend_percent,
        "calculating plan year"
    );

    // Step 1: Gross salary
    let gross_salary_yearly = non_negative(input.gross_salary_monthly.saturating_mul(MONTHS_PER_YEAR));

    // Steps 2-3: Employer contributions
    let employer_contribution_yearly = employer_contribution_yearly(
        gross_salary_yearly,
        input.gross_salary_monthly,
        settings,
    );

    // Step 4: Salary tax and net salary
    let salary_tax_yearly = percent_of(gross_salary_yearly, non_negative(settings.total_tax_rate));
    let net_salary_yearly = non_negative(gross_salary_yearly - salary_tax_yearly);

    // Step 5: Costs and revenue
    let costs_yearly = non_negative(input.other_costs_monthly.saturating_mul(MONTHS_PER_YEAR));
    let billed_yearly = non_negative(
        input
            .hourly_rate
            .saturating_mul(input.hours_per_month)
            .saturating_mul(MONTHS_PER_YEAR),
    );

    // Steps 6-7: Surplus before and after buffer
    let surplus_before_buffer = billed_yearly
        .saturating_sub(gross_salary_yearly)
        .saturating_sub(employer_contribution_yearly)
        .saturating_sub(costs_yearly);
    let buffer_yearly = non_negative(percent_of(
        surplus_before_buffer,
        non_negative(input.buffer_percent),
    ));
    let surplus_yearly = surplus_before_buffer.saturating_sub(buffer_yearly);

    // Step 8: Corporate tax
    let corporate_tax_yearly = non_negative(percent_of(
        surplus_yearly,
        non_negative(settings.corporate_tax),
    ));
    let net_profit_yearly = surplus_yearly.saturating_sub(corporate_tax_yearly);

    // Steps 9-10: Equity available for distribution
    let opening_equity = opening_equity(settings, previous_year, year_number);
    let max_dividend_by_equity = non_negative(opening_equity.saturating_add(net_profit_yearly));

    // Step 11: Dividend allowance
    let allowance = dividend_allowance(gross_salary_yearly, settings, previous_year);
    let dividend_allowance_pct = if max_dividend_by_equity > Decimal::ZERO {
        saturating_div(allowance.total, max_dividend_by_equity).saturating_mul(Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    };

    // Step 12: Gross dividend
    let gross_dividend = non_negative(percent_of(
        max_dividend_by_equity,
        non_negative(input.dividend_percent),
    ));

    // Step 13: Low/high tax split
    let low_tax_dividend = gross_dividend.min(allowance.total);
    let high_tax_dividend = non_negative(gross_dividend - allowance.total);
    let net_dividend = net_dividend(
        low_tax_dividend,
        high_tax_dividend,
        settings.marginal_tax_rate,
        &settings.rules,
    );

    // Steps 14-15: Owner totals
    let total_net_monthly = net_salary_yearly.saturating_add(net_dividend) / MONTHS_PER_YEAR;
    let equivalent_gross_salary_monthly = gross_up(total_net_monthly, settings.total_tax_rate);

    // Steps 16-17: Carried to next year
    let closing_equity = non_negative(max_dividend_by_equity - gross_dividend);
    let saved_dividend_allowance = non_negative(allowance.total - low_tax_dividend);

    YearCalculation {
        year_number,
        input: input.clone(),
        gross_salary_yearly,
        employer_contribution_yearly,
        salary_tax_yearly,
        net_salary_yearly,
        costs_yearly,
        billed_yearly,
        buffer_yearly,
        surplus_yearly,
        corporate_tax_yearly,
        net_profit_yearly,
        opening_equity,
        max_dividend_by_equity,
        payroll_base_yearly: allowance.payroll_base,
        wage_floor: allowance.wage_floor,
        eligible_for_main_rule: allowance.eligible_for_main_rule,
        simplified_rule_allowance: allowance.simplified_rule,
        main_rule_allowance: allowance.main_rule,
        carried_forward_allowance: allowance.carried_forward,
        dividend_allowance_sek: allowance.total,
        dividend_allowance_pct,
        gross_dividend,
        low_tax_dividend,
        high_tax_dividend,
        net_dividend,
        total_net_monthly,
        equivalent_gross_salary_monthly,
        closing_equity,
        saved_dividend_allowance,
    }
}

/// Employer contributions for the year, reduced under regional support.
fn employer_contribution_yearly(
    gross_salary_yearly: Decimal,
    gross_salary_monthly: Decimal,
    settings: &GlobalSettings,
) -> Decimal {
    let rate = effective_employer_rate(settings.employer_contribution, settings.regional_support);
    let contribution = percent_of(gross_salary_yearly, rate);

    if !settings.regional_support {
        return contribution;
    }

    let yearly_deduction =
        regional_support_deduction(gross_salary_monthly).saturating_mul(MONTHS_PER_YEAR);
    non_negative(contribution - yearly_deduction)
}

fn opening_equity(
    settings: &GlobalSettings,
    previous_year: Option<&YearCalculation>,
    year_number: u32,
) -> Decimal {
    if year_number <= 1 {
        return non_negative(settings.opening_free_equity);
    }
    previous_year
        .map(|previous| non_negative(previous.closing_equity))
        .unwrap_or(Decimal::ZERO)
}

/// Dividend allowance under the simplified and main rules, plus carry-forward.
///
/// The main rule only applies when the owner's own salary reaches the wage
/// floor; the larger of the two rules is used.
fn dividend_allowance(
    gross_salary_yearly: Decimal,
    settings: &GlobalSettings,
    previous_year: Option<&YearCalculation>,
) -> Allowance {
    let rules = &settings.rules;
    let ibb = non_negative(settings.ibb);
    let payroll_base = settings.payroll_base.resolve(gross_salary_yearly);

    let wage_floor = rules
        .wage_floor_ibb_multiplier
        .saturating_mul(ibb)
        .saturating_add(rules.wage_floor_salary_share.saturating_mul(payroll_base))
        .max(rules.wage_floor_minimum_ibb_multiplier.saturating_mul(ibb));
    let eligible_for_main_rule = gross_salary_yearly >= wage_floor;

    let simplified_rule = rules.simplified_rule_ibb_multiplier.saturating_mul(ibb);
    let main_rule = if eligible_for_main_rule {
        payroll_base
            .saturating_mul(rules.main_rule_salary_share)
            .saturating_add(percent_of(
                non_negative(settings.share_acquisition_value),
                rules.main_rule_interest_rate,
            ))
    } else {
        Decimal::ZERO
    };

    let saved = previous_year
        .map(|previous| non_negative(previous.saved_dividend_allowance))
        .unwrap_or(Decimal::ZERO);
    let carried_forward = saved.saturating_mul(rules.carry_forward_factor());

    Allowance {
        payroll_base,
        wage_floor,
        eligible_for_main_rule,
        simplified_rule,
        main_rule,
        carried_forward,
        total: simplified_rule.max(main_rule).saturating_add(carried_forward),
    }
}

/// Net dividend after the flat low rate and the marginal rate.
fn net_dividend(
    low_tax_dividend: Decimal,
    high_tax_dividend: Decimal,
    marginal_tax_rate: Decimal,
    rules: &DividendRules,
) -> Decimal {
    let low_net = low_tax_dividend - percent_of(low_tax_dividend, rules.low_dividend_tax_rate);
    let high_net = high_tax_dividend - percent_of(high_tax_dividend, non_negative(marginal_tax_rate));
    non_negative(low_net.saturating_add(high_net))
}
