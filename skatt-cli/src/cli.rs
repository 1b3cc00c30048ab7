//! Command-line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use skatt_core::calculations::{DeductionModel, HourlyRateInput, PensionInput};

use crate::utils::parse_decimal;

/// Salary, dividend and company-car calculators for Swedish owner-operators.
#[derive(Debug, Parser)]
#[command(name = "skatt", version, about, long_about = None)]
pub struct Cli {
    /// Log filter such as `debug` or `skatt_core=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Append log output to this file as well.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Directory holding tax_tables.csv, municipalities.csv and vehicles.csv.
    #[arg(long, global = true, default_value = "data")]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Multi-year salary and dividend plan from a TOML plan file.
    Plan(PlanArgs),

    /// Hourly rate needed to cover a desired net salary.
    HourlyRate(HourlyRateArgs),

    /// Net salary with and without a company car.
    CarBenefit(CarBenefitArgs),

    /// Take-home pay from the municipality's withholding table.
    NetSalary(NetSalaryArgs),

    /// Two-tier occupational pension premium.
    Pension(PensionArgs),
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// TOML file with a [settings] table and [[years]] entries.
    #[arg(short, long)]
    pub file: PathBuf,

    /// Read the yearly inputs from a CSV file instead of [[years]].
    #[arg(long)]
    pub years_csv: Option<PathBuf>,

    /// Override the number of planned years.
    #[arg(long)]
    pub years: Option<u32>,
}

#[derive(Debug, Args)]
pub struct HourlyRateArgs {
    /// Desired monthly net salary, SEK.
    #[arg(long, default_value = "30000", value_parser = parse_decimal)]
    pub net_salary: Decimal,

    /// Flat tax rate on salary, percent.
    #[arg(long, default_value = "32", value_parser = parse_decimal)]
    pub tax_rate: Decimal,

    /// Employer contribution rate, percent.
    #[arg(long, default_value = "31.42", value_parser = parse_decimal)]
    pub employer_contribution: Decimal,

    /// Apply the regional support reduction.
    #[arg(long)]
    pub regional_support: bool,

    /// Other monthly business costs, SEK.
    #[arg(long, default_value = "5000", value_parser = parse_decimal)]
    pub business_costs: Decimal,

    /// Billable hours per month.
    #[arg(long, default_value = "140", value_parser = parse_decimal)]
    pub hours: Decimal,

    /// Safety buffer on top of all costs, percent.
    #[arg(long, default_value = "20", value_parser = parse_decimal)]
    pub buffer: Decimal,

    /// Monthly amount to keep in the company, SEK.
    #[arg(long, default_value = "0", value_parser = parse_decimal)]
    pub savings_goal: Decimal,

    /// Also show the rate at 120, 140, 160 and 180 hours.
    #[arg(long)]
    pub scenarios: bool,
}

impl From<&HourlyRateArgs> for HourlyRateInput {
    fn from(args: &HourlyRateArgs) -> Self {
        HourlyRateInput {
            desired_net_salary: args.net_salary,
            tax_rate: args.tax_rate,
            employer_contribution: args.employer_contribution,
            regional_support: args.regional_support,
            business_costs: args.business_costs,
            billable_hours: args.hours,
            buffer_percentage: args.buffer,
            savings_goal: args.savings_goal,
        }
    }
}

/// Where the withholding table comes from.
#[derive(Debug, Args)]
pub struct TableArgs {
    /// Municipality whose rates select the withholding table.
    #[arg(long, default_value = "Stockholm")]
    pub municipality: String,

    /// Use the church-member table.
    #[arg(long)]
    pub church_member: bool,

    /// Income year of the table.
    #[arg(long, default_value_t = 2025)]
    pub year: i32,

    /// Table column, 1 through 7.
    #[arg(long, default_value_t = 1)]
    pub column: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeductionModelArg {
    /// Bruttolöneavdrag.
    Gross,
    /// Nettolöneavdrag.
    Net,
}

impl From<DeductionModelArg> for DeductionModel {
    fn from(arg: DeductionModelArg) -> Self {
        match arg {
            DeductionModelArg::Gross => DeductionModel::Gross,
            DeductionModelArg::Net => DeductionModel::Net,
        }
    }
}

#[derive(Debug, Args)]
pub struct CarBenefitArgs {
    /// Monthly gross salary, SEK.
    #[arg(long, value_parser = parse_decimal)]
    pub gross_salary: Decimal,

    /// Monthly benefit value, SEK. Computed from the vehicle when omitted.
    #[arg(long, value_parser = parse_decimal)]
    pub benefit_value: Option<Decimal>,

    /// Vehicle brand, for the benefit value lookup.
    #[arg(long, requires_all = ["model", "model_year"])]
    pub brand: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub model_year: Option<i32>,

    /// Value of extra equipment, SEK.
    #[arg(long, default_value = "0", value_parser = parse_decimal)]
    pub extra_equipment: Decimal,

    /// At least 3 000 mil driven in service.
    #[arg(long)]
    pub mileage_reduction: bool,

    #[arg(long, value_enum, default_value_t = DeductionModelArg::Net)]
    pub deduction_model: DeductionModelArg,

    #[arg(long, default_value = "0", value_parser = parse_decimal)]
    pub gross_deduction: Decimal,

    #[arg(long, default_value = "0", value_parser = parse_decimal)]
    pub net_deduction: Decimal,

    /// Monthly cost of a comparable private lease, SEK.
    #[arg(long, default_value = "0", value_parser = parse_decimal)]
    pub private_leasing: Decimal,

    /// Monthly cost of a comparable business lease, SEK.
    #[arg(long, default_value = "0", value_parser = parse_decimal)]
    pub business_leasing: Decimal,

    #[arg(long, default_value = "31.42", value_parser = parse_decimal)]
    pub employer_contribution: Decimal,

    /// Also report which deduction model leaves more net salary.
    #[arg(long)]
    pub compare: bool,

    #[command(flatten)]
    pub table: TableArgs,
}

#[derive(Debug, Args)]
pub struct NetSalaryArgs {
    /// Monthly gross salary, SEK.
    #[arg(long, value_parser = parse_decimal)]
    pub gross_salary: Decimal,

    #[command(flatten)]
    pub table: TableArgs,
}

#[derive(Debug, Args)]
pub struct PensionArgs {
    /// Monthly salary, SEK.
    #[arg(long, value_parser = parse_decimal)]
    pub salary: Decimal,

    /// Income base amount. Defaults to the published amount for --year.
    #[arg(long, value_parser = parse_decimal)]
    pub ibb: Option<Decimal>,

    #[arg(long, default_value_t = 2025)]
    pub year: i32,

    /// Premium below 7.5 income base amounts, percent.
    #[arg(long, default_value = "4.5", value_parser = parse_decimal)]
    pub lower_rate: Decimal,

    /// Premium above 7.5 income base amounts, percent.
    #[arg(long, default_value = "30", value_parser = parse_decimal)]
    pub higher_rate: Decimal,
}

impl PensionArgs {
    pub fn to_input(
        &self,
        ibb: Decimal,
    ) -> PensionInput {
        PensionInput {
            monthly_salary: self.salary,
            ibb,
            lower_rate: self.lower_rate,
            higher_rate: self.higher_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn hourly_rate_defaults() {
        let cli = Cli::parse_from(["skatt", "hourly-rate"]);

        let Command::HourlyRate(args) = &cli.command else {
            panic!("expected hourly-rate, got {:?}", cli.command);
        };
        let input = HourlyRateInput::from(args);
        assert_eq!(input, HourlyRateInput::default());
    }

    #[test]
    fn amounts_accept_swedish_formatting() {
        let cli = Cli::parse_from(["skatt", "net-salary", "--gross-salary", "45 000,50"]);

        let Command::NetSalary(args) = &cli.command else {
            panic!("expected net-salary, got {:?}", cli.command);
        };
        assert_eq!(args.gross_salary, dec!(45000.50));
        assert_eq!(args.table.municipality, "Stockholm");
        assert_eq!(args.table.column, 1);
    }

    #[test]
    fn brand_requires_model_and_year() {
        let result = Cli::try_parse_from([
            "skatt",
            "car-benefit",
            "--gross-salary",
            "40000",
            "--brand",
            "VOLVO",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::parse_from(["skatt", "pension", "--salary", "60000", "--data-dir", "/tmp/ref"]);

        assert_eq!(cli.data_dir, PathBuf::from("/tmp/ref"));
    }
}
