//! Break-even hourly rate for a consultant paying themselves a salary.
//!
//! Starting from the net salary the owner wants each month, the solver grosses
//! it up through a flat tax rate, adds employer contributions, business costs
//! and a savings goal, applies a safety buffer, and spreads the total over the
//! billable hours.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use skatt_core::calculations::{HourlyRateInput, solve_hourly_rate};
//!
//! let input = HourlyRateInput {
//!     desired_net_salary: dec!(34000),
//!     tax_rate: dec!(32),
//!     employer_contribution: dec!(0),
//!     regional_support: false,
//!     business_costs: dec!(0),
//!     billable_hours: dec!(100),
//!     buffer_percentage: dec!(0),
//!     savings_goal: dec!(0),
//! };
//!
//! let result = solve_hourly_rate(&input);
//!
//! assert_eq!(result.gross_salary, dec!(50000));
//! assert_eq!(result.hourly_rate, dec!(500));
//! assert_eq!(result.hourly_rate_with_vat, dec!(625));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{
    effective_employer_rate, gross_up, non_negative, percent_of, regional_support_deduction,
};

/// Swedish standard VAT multiplier (25 %).
pub const VAT_MULTIPLIER: Decimal = Decimal::from_parts(125, 0, 0, false, 2);

/// Monthly billable-hour levels commonly compared side by side.
pub const SCENARIO_HOURS: [u32; 4] = [120, 140, 160, 180];

/// Monthly inputs for the hourly-rate solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HourlyRateInput {
    /// Net salary the owner wants to take home each month, SEK.
    pub desired_net_salary: Decimal,
    /// Flat personal tax rate on salary in percent; may already include
    /// county and church components.
    #[serde(alias = "municipal_tax")]
    pub tax_rate: Decimal,
    /// Employer contribution rate, percent.
    pub employer_contribution: Decimal,
    pub regional_support: bool,
    /// Other monthly business costs, SEK.
    pub business_costs: Decimal,
    /// Billable hours per month.
    pub billable_hours: Decimal,
    /// Safety margin added on top of all costs, percent.
    pub buffer_percentage: Decimal,
    /// Monthly amount to retain in the company, SEK.
    pub savings_goal: Decimal,
}

impl Default for HourlyRateInput {
    fn default() -> Self {
        Self {
            desired_net_salary: Decimal::from(30_000),
            tax_rate: Decimal::from(32),
            employer_contribution: Decimal::new(3142, 2),
            regional_support: false,
            business_costs: Decimal::from(5_000),
            billable_hours: Decimal::from(140),
            buffer_percentage: Decimal::from(20),
            savings_goal: Decimal::ZERO,
        }
    }
}

/// Output of the hourly-rate solver. Monthly unless prefixed `annual_`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRateResult {
    pub gross_salary: Decimal,
    pub employer_contributions: Decimal,
    pub total_monthly_cost: Decimal,
    pub hourly_rate: Decimal,
    pub hourly_rate_with_vat: Decimal,
    pub monthly_revenue: Decimal,
    pub annual_gross_salary: Decimal,
    pub annual_cost: Decimal,
    pub annual_revenue: Decimal,
}

/// Solves for the hourly rate that covers salary, contributions and costs.
///
/// Never fails: a tax rate of 100 % or more is clamped just below 100 %, and
/// fewer than one billable hour is treated as one.
pub fn solve_hourly_rate(input: &HourlyRateInput) -> HourlyRateResult {
    debug!(
        desired_net_salary = %input.desired_net_salary,
        tax_rate = %input.tax_rate,
        billable_hours = %input.billable_hours,
        "solving hourly rate"
    );

    let gross_salary = gross_up(input.desired_net_salary, input.tax_rate);

    let employer_rate =
        effective_employer_rate(non_negative(input.employer_contribution), input.regional_support);
    let mut employer_contributions = percent_of(gross_salary, employer_rate);
    if input.regional_support {
        employer_contributions =
            non_negative(employer_contributions - regional_support_deduction(gross_salary));
    }

    let base_cost = gross_salary
        + employer_contributions
        + non_negative(input.business_costs)
        + non_negative(input.savings_goal);
    let total_monthly_cost =
        base_cost * (Decimal::ONE + non_negative(input.buffer_percentage) / Decimal::ONE_HUNDRED);

    let hours = billable_hours(input.billable_hours);
    let hourly_rate = total_monthly_cost / hours;
    let hourly_rate_with_vat = hourly_rate * VAT_MULTIPLIER;
    let monthly_revenue = hourly_rate * hours;

    let months = Decimal::from(12);
    HourlyRateResult {
        gross_salary,
        employer_contributions,
        total_monthly_cost,
        hourly_rate,
        hourly_rate_with_vat,
        monthly_revenue,
        annual_gross_salary: gross_salary * months,
        annual_cost: total_monthly_cost * months,
        annual_revenue: monthly_revenue * months,
    }
}

/// Solves the same input at several billable-hour levels.
pub fn hourly_rate_scenarios(
    input: &HourlyRateInput,
    hours: &[u32],
) -> Vec<(u32, HourlyRateResult)> {
    hours
        .iter()
        .map(|&h| {
            let scenario = HourlyRateInput {
                billable_hours: Decimal::from(h),
                ..input.clone()
            };
            (h, solve_hourly_rate(&scenario))
        })
        .collect()
}

fn billable_hours(hours: Decimal) -> Decimal {
    if hours < Decimal::ONE {
        warn!(billable_hours = %hours, "billable hours below one; using one hour");
        return Decimal::ONE;
    }
    hours
}
