use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The owner's choices for one planned fiscal year.
///
/// Amounts are SEK, `*_percent` fields are percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearInput {
    pub hourly_rate: Decimal,
    pub hours_per_month: Decimal,
    pub gross_salary_monthly: Decimal,
    pub other_costs_monthly: Decimal,
    /// Share of the pre-buffer surplus kept as a safety margin.
    pub buffer_percent: Decimal,
    /// Share of the year's distributable equity paid out as dividend.
    pub dividend_percent: Decimal,
}

impl Default for YearInput {
    fn default() -> Self {
        Self {
            hourly_rate: Decimal::from(750),
            hours_per_month: Decimal::from(133),
            gross_salary_monthly: Decimal::from(50_000),
            other_costs_monthly: Decimal::from(15_000),
            buffer_percent: Decimal::from(10),
            dividend_percent: Decimal::from(20),
        }
    }
}

/// Fully derived figures for one fiscal year of a dividend plan.
///
/// Produced by [`calculate_year`](crate::calculations::calculate_year); the
/// closing equity and saved allowance feed the following year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCalculation {
    /// 1-based position in the plan.
    pub year_number: u32,
    pub input: YearInput,

    // Salary
    pub gross_salary_yearly: Decimal,
    pub employer_contribution_yearly: Decimal,
    pub salary_tax_yearly: Decimal,
    pub net_salary_yearly: Decimal,

    // Company result
    pub costs_yearly: Decimal,
    pub billed_yearly: Decimal,
    pub buffer_yearly: Decimal,
    /// Surplus after buffer; negative when the year runs at a loss.
    pub surplus_yearly: Decimal,
    pub corporate_tax_yearly: Decimal,
    /// Result after corporate tax; may be negative.
    pub net_profit_yearly: Decimal,

    // Equity
    pub opening_equity: Decimal,
    pub max_dividend_by_equity: Decimal,

    // Dividend allowance (gränsbelopp)
    pub payroll_base_yearly: Decimal,
    pub wage_floor: Decimal,
    pub eligible_for_main_rule: bool,
    pub simplified_rule_allowance: Decimal,
    pub main_rule_allowance: Decimal,
    pub carried_forward_allowance: Decimal,
    pub dividend_allowance_sek: Decimal,
    pub dividend_allowance_pct: Decimal,

    // Dividend
    pub gross_dividend: Decimal,
    pub low_tax_dividend: Decimal,
    pub high_tax_dividend: Decimal,
    pub net_dividend: Decimal,

    // Owner totals
    pub total_net_monthly: Decimal,
    pub equivalent_gross_salary_monthly: Decimal,

    // Carried to next year
    pub closing_equity: Decimal,
    pub saved_dividend_allowance: Decimal,
}
