//! Plain-text reports printed by the command-line front-end.

use std::fmt;

use rust_decimal::Decimal;
use skatt_core::calculations::{
    CarBenefitResult, DeductionModel, HourlyRateResult, NetSalaryResult, PensionResult,
    PlanSummary, TaxColumn,
};
use skatt_core::{GlobalSettings, YearCalculation};

use crate::utils::{format_percent, format_sek};

fn model_label(model: DeductionModel) -> &'static str {
    match model {
        DeductionModel::Gross => "gross-salary deduction (bruttolöneavdrag)",
        DeductionModel::Net => "net-salary deduction (nettolöneavdrag)",
    }
}

fn row(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    amount: Decimal,
) -> fmt::Result {
    writeln!(f, "  {label:<32}{:>16}", format_sek(amount))
}

// ---------------------------------------------------------------------------
// Dividend plan
// ---------------------------------------------------------------------------

pub struct PlanReport {
    pub settings: GlobalSettings,
    pub years: Vec<YearCalculation>,
    pub summary: PlanSummary,
}

impl PlanReport {
    pub fn new(
        settings: GlobalSettings,
        years: Vec<YearCalculation>,
    ) -> Self {
        let summary = PlanSummary::from_years(&years);
        Self {
            settings,
            years,
            summary,
        }
    }
}

impl fmt::Display for PlanReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let s = &self.settings;
        writeln!(f, "Dividend plan, {} years", self.years.len())?;
        if let Some(name) = &s.municipality {
            writeln!(f, "Municipality:         {name}")?;
        }
        writeln!(f, "Salary tax rate:      {}", format_percent(s.total_tax_rate))?;
        writeln!(f, "Marginal tax rate:    {}", format_percent(s.marginal_tax_rate))?;
        writeln!(f, "Corporate tax:        {}", format_percent(s.corporate_tax))?;
        writeln!(
            f,
            "Employer contribution: {}{}",
            format_percent(s.employer_contribution),
            if s.regional_support {
                " (regional support)"
            } else {
                ""
            }
        )?;
        writeln!(f, "Income base amount:   {}", format_sek(s.ibb))?;

        for year in &self.years {
            writeln!(f)?;
            writeln!(f, "Year {}", year.year_number)?;
            row(f, "Billed", year.billed_yearly)?;
            row(f, "Gross salary", year.gross_salary_yearly)?;
            row(f, "Employer contributions", year.employer_contribution_yearly)?;
            row(f, "Net salary", year.net_salary_yearly)?;
            row(f, "Other costs", year.costs_yearly)?;
            row(f, "Buffer", year.buffer_yearly)?;
            row(f, "Result before tax", year.surplus_yearly)?;
            row(f, "Corporate tax", year.corporate_tax_yearly)?;
            row(f, "Net profit", year.net_profit_yearly)?;
            row(f, "Opening equity", year.opening_equity)?;
            writeln!(
                f,
                "  {:<32}{:>16}",
                if year.eligible_for_main_rule {
                    "Dividend allowance (main rule)"
                } else {
                    "Dividend allowance (simplified)"
                },
                format_sek(year.dividend_allowance_sek)
            )?;
            row(f, "Gross dividend", year.gross_dividend)?;
            row(f, "  taxed at the low rate", year.low_tax_dividend)?;
            row(f, "  taxed as salary", year.high_tax_dividend)?;
            row(f, "Net dividend", year.net_dividend)?;
            row(f, "Net to owner per month", year.total_net_monthly)?;
            row(f, "Equivalent salary per month", year.equivalent_gross_salary_monthly)?;
            row(f, "Closing equity", year.closing_equity)?;
            row(f, "Saved allowance", year.saved_dividend_allowance)?;
        }

        let t = &self.summary;
        writeln!(f)?;
        writeln!(f, "Totals")?;
        row(f, "Net salary", t.total_net_salary)?;
        row(f, "Net dividend", t.total_net_dividend)?;
        row(f, "Net to owner", t.total_net_to_owner)?;
        row(f, "Corporate tax", t.total_corporate_tax)?;
        row(f, "Final equity", t.final_equity)?;
        row(f, "Unused allowance", t.final_saved_allowance)
    }
}

// ---------------------------------------------------------------------------
// Hourly rate
// ---------------------------------------------------------------------------

pub struct HourlyRateReport {
    pub result: HourlyRateResult,
    pub scenarios: Vec<(u32, HourlyRateResult)>,
}

impl fmt::Display for HourlyRateReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let r = &self.result;
        writeln!(f, "Hourly rate")?;
        row(f, "Gross salary", r.gross_salary)?;
        row(f, "Employer contributions", r.employer_contributions)?;
        row(f, "Monthly cost incl. buffer", r.total_monthly_cost)?;
        row(f, "Hourly rate excl. VAT", r.hourly_rate)?;
        row(f, "Hourly rate incl. VAT", r.hourly_rate_with_vat)?;
        row(f, "Monthly revenue", r.monthly_revenue)?;
        row(f, "Annual revenue", r.annual_revenue)?;

        if !self.scenarios.is_empty() {
            writeln!(f)?;
            writeln!(f, "  {:>6}{:>16}{:>16}", "Hours", "Rate", "Incl. VAT")?;
            for (hours, scenario) in &self.scenarios {
                writeln!(
                    f,
                    "  {hours:>6}{:>16}{:>16}",
                    format_sek(scenario.hourly_rate),
                    format_sek(scenario.hourly_rate_with_vat)
                )?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Company car
// ---------------------------------------------------------------------------

pub struct CarBenefitReport {
    pub benefit_value: Decimal,
    pub model: DeductionModel,
    pub result: CarBenefitResult,
    /// Set when both deduction models were compared.
    pub best_model: Option<DeductionModel>,
}

impl fmt::Display for CarBenefitReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let r = &self.result;
        writeln!(f, "Company car, {}", model_label(self.model))?;
        row(f, "Benefit value", self.benefit_value)?;
        row(f, "Taxable benefit", r.taxable_benefit)?;
        row(f, "Gross salary", r.adjusted_gross_salary)?;
        row(f, "Paid privately", r.private_payment)?;
        writeln!(f)?;
        row(f, "Tax without car", r.tax_without_car)?;
        row(f, "Net salary without car", r.net_salary_without_car)?;
        row(f, "Tax with car", r.tax_with_car)?;
        row(f, "Net salary with car", r.net_salary_with_car)?;
        row(f, "Monthly difference", r.monthly_difference)?;
        if r.compared_to_private_leasing != Decimal::ZERO {
            row(f, "vs. private leasing", r.compared_to_private_leasing)?;
        }
        if r.compared_to_business_leasing != Decimal::ZERO {
            row(f, "vs. business leasing", r.compared_to_business_leasing)?;
        }
        row(f, "Employer cost, benefit", r.employer_cost_benefit)?;
        row(f, "Employer cost, total", r.employer_cost_total)?;

        if let Some(best) = self.best_model {
            writeln!(f)?;
            writeln!(f, "Best model: {}", model_label(best))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Net salary
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct NetSalaryReport {
    pub municipality: String,
    pub table_id: String,
    pub column: TaxColumn,
    pub result: NetSalaryResult,
}

impl fmt::Display for NetSalaryReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let r = &self.result;
        writeln!(
            f,
            "Net salary in {}, table {} column {}",
            self.municipality,
            self.table_id,
            self.column.number()
        )?;
        writeln!(f, "  ({})", self.column.description())?;
        row(f, "Gross salary", r.gross_salary)?;
        row(f, "Tax withheld", r.tax_deduction)?;
        row(f, "Net salary", r.net_salary)?;
        writeln!(f, "  {:<32}{:>16}", "Withholding rate", format_percent(r.withholding_rate))?;
        writeln!(f, "  {:<32}{:>16}", "Municipal tax", format_percent(r.municipal_tax))?;
        writeln!(f, "  {:<32}{:>16}", "County tax", format_percent(r.county_tax))?;
        if r.church_tax > Decimal::ZERO {
            writeln!(f, "  {:<32}{:>16}", "Church fee", format_percent(r.church_tax))?;
        }
        writeln!(f, "  {:<32}{:>16}", "Total local rate", format_percent(r.total_tax_rate))
    }
}

// ---------------------------------------------------------------------------
// Pension
// ---------------------------------------------------------------------------

pub struct PensionReport {
    pub result: PensionResult,
}

impl fmt::Display for PensionReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let r = &self.result;
        writeln!(f, "Occupational pension")?;
        row(f, "Threshold per month", r.monthly_threshold)?;
        row(f, "Premium below threshold", r.lower_part)?;
        row(f, "Premium above threshold", r.higher_part)?;
        row(f, "Premium per month", r.total_monthly)?;
        row(f, "Premium per year", r.total_yearly)?;
        writeln!(
            f,
            "  {:<32}{:>16}",
            "Share of salary",
            format_percent(r.percentage_of_salary)
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use skatt_core::YearInput;
    use skatt_core::calculations::{PensionInput, calculate_all_years, calculate_pension};

    use super::*;

    #[test]
    fn plan_report_lists_every_year_and_totals() {
        let settings = GlobalSettings::default();
        let inputs = vec![
            YearInput {
                dividend_percent: dec!(0),
                ..YearInput::default()
            };
            2
        ];
        let years = calculate_all_years(&inputs, &settings);

        let text = PlanReport::new(settings, years).to_string();

        assert!(text.starts_with("Dividend plan, 2 years\n"));
        assert!(text.contains("Year 1\n"));
        assert!(text.contains("Year 2\n"));
        assert!(text.contains("600 000 kr"));
        assert!(text.contains("Totals\n"));
        // Two years of 408 000 net salary.
        assert!(text.contains("816 000 kr"));
    }

    #[test]
    fn plan_report_names_the_allowance_rule() {
        let settings = GlobalSettings::default();
        let years = calculate_all_years(&[YearInput::default()], &settings);

        let text = PlanReport::new(settings, years).to_string();

        assert!(text.contains("Dividend allowance (simplified)"));
    }

    #[test]
    fn pension_report_shows_monthly_and_yearly_premium() {
        let result = calculate_pension(&PensionInput {
            monthly_salary: dec!(60000),
            ibb: dec!(80600),
            lower_rate: dec!(4.5),
            higher_rate: dec!(30),
        });

        let text = PensionReport { result }.to_string();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Occupational pension");
        assert!(lines[1].ends_with("50 375 kr"));
        assert!(lines[4].ends_with("5 154 kr"));
        assert!(lines[5].ends_with("61 853 kr"));
        assert!(lines[6].ends_with("8,59 %"));
    }

    #[test]
    fn car_report_only_mentions_best_model_when_compared() {
        let result = CarBenefitResult {
            net_salary_without_car: dec!(30600),
            tax_without_car: dec!(9400),
            net_salary_with_car: dec!(29400),
            tax_with_car: dec!(10600),
            effective_benefit_value: dec!(3420),
            monthly_difference: dec!(-1200),
            compared_to_private_leasing: dec!(0),
            compared_to_business_leasing: dec!(0),
            employer_cost_benefit: dec!(1074.56),
            employer_cost_total: dec!(13642.56),
            adjusted_gross_salary: dec!(40000),
            taxable_benefit: dec!(3420),
            private_payment: dec!(0),
        };
        let mut report = CarBenefitReport {
            benefit_value: dec!(3420),
            model: DeductionModel::Net,
            result,
            best_model: None,
        };

        assert!(!report.to_string().contains("Best model"));
        assert!(!report.to_string().contains("leasing"));
        assert!(report.to_string().contains("-1 200 kr"));

        report.best_model = Some(DeductionModel::Gross);
        assert!(report.to_string().contains("Best model: gross-salary deduction"));
    }
}
