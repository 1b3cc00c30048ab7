//! Runs a parsed command against the reference data and renders the report.
//!
//! Every command returns its report as a `String`; printing is left to
//! `main`. Lookups go through the provider traits so tests can hand in
//! in-memory data.

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use rust_decimal::Decimal;
use skatt_core::calculations::{
    BenefitValueInput, CarBenefitInput, DeductionModel, HourlyRateInput, SCENARIO_HOURS,
    TaxColumn, best_deduction_model, calculate_all_years, calculate_benefit_value,
    calculate_car_benefit, calculate_net_salary, calculate_pension, hourly_rate_scenarios,
    solve_hourly_rate,
};
use skatt_core::{
    MunicipalRate, MunicipalRateProvider, TaxTableEntry, TaxTableProvider, VehicleProvider,
    income_base_amount,
};
use skatt_data::ReferenceData;
use tracing::{debug, info};

use crate::cli::{
    CarBenefitArgs, Cli, Command, HourlyRateArgs, NetSalaryArgs, PensionArgs, PlanArgs, TableArgs,
};
use crate::csv_loader;
use crate::plan_file::PlanFile;
use crate::report::{
    CarBenefitReport, HourlyRateReport, NetSalaryReport, PensionReport, PlanReport,
};

/// Executes `cli.command` and returns the rendered report.
pub fn run(cli: &Cli) -> Result<String> {
    match &cli.command {
        Command::Plan(args) => {
            Ok(plan(args, || load_reference_data(&cli.data_dir))?.to_string())
        }
        Command::HourlyRate(args) => Ok(hourly_rate(args).to_string()),
        Command::CarBenefit(args) => {
            let data = load_reference_data(&cli.data_dir)?;
            Ok(car_benefit(args, &data)?.to_string())
        }
        Command::NetSalary(args) => {
            let data = load_reference_data(&cli.data_dir)?;
            Ok(net_salary(args, &data)?.to_string())
        }
        Command::Pension(args) => Ok(pension(args)?.to_string()),
    }
}

fn load_reference_data(dir: &Path) -> Result<ReferenceData> {
    ReferenceData::from_dir(dir)
        .with_context(|| format!("failed to load reference data from {}", dir.display()))
}

/// Runs a plan file. `load_municipalities` is only called when the file names
/// a municipality without giving its tax rate.
pub fn plan<P, F>(
    args: &PlanArgs,
    load_municipalities: F,
) -> Result<PlanReport>
where
    P: MunicipalRateProvider,
    F: FnOnce() -> Result<P>,
{
    let mut plan_file = PlanFile::load(&args.file)?;
    if plan_file.needs_municipal_rates() {
        let municipalities = load_municipalities()?;
        plan_file
            .apply_municipality(&municipalities)
            .context("failed to resolve municipal tax rates")?;
    }

    if let Some(years) = args.years {
        plan_file.settings.number_of_years = Some(years);
    }
    if let Some(path) = &args.years_csv {
        plan_file.years = csv_loader::load_from_file(path)
            .with_context(|| format!("failed to load yearly inputs from {}", path.display()))?;
    }

    let (settings, inputs) = plan_file.into_plan()?;
    info!(
        years = inputs.len(),
        total_tax_rate = %settings.total_tax_rate,
        "running dividend plan"
    );
    let years = calculate_all_years(&inputs, &settings);
    Ok(PlanReport::new(settings, years))
}

pub fn hourly_rate(args: &HourlyRateArgs) -> HourlyRateReport {
    let input = HourlyRateInput::from(args);
    let scenarios = if args.scenarios {
        hourly_rate_scenarios(&input, &SCENARIO_HOURS)
    } else {
        Vec::new()
    };
    HourlyRateReport {
        result: solve_hourly_rate(&input),
        scenarios,
    }
}

/// The withholding table picked from municipality, church membership and year.
struct ResolvedTable {
    municipality: MunicipalRate,
    table_id: String,
    column: TaxColumn,
    rows: Vec<TaxTableEntry>,
}

fn resolve_table<D>(
    table: &TableArgs,
    data: &D,
) -> Result<ResolvedTable>
where
    D: TaxTableProvider + MunicipalRateProvider,
{
    let column = TaxColumn::new(table.column)?;
    let municipality = data
        .municipality(&table.municipality)
        .with_context(|| format!("unknown municipality '{}'", table.municipality))?;
    let table_id = municipality.table_id(table.church_member);
    let rows = data
        .tax_table(table.year, &table_id)
        .with_context(|| format!("no withholding table for {}", municipality.name))?;

    debug!(
        municipality = %municipality.name,
        table_id = %table_id,
        rows = rows.len(),
        "resolved withholding table"
    );
    Ok(ResolvedTable {
        municipality,
        table_id,
        column,
        rows,
    })
}

pub fn net_salary<D>(
    args: &NetSalaryArgs,
    data: &D,
) -> Result<NetSalaryReport>
where
    D: TaxTableProvider + MunicipalRateProvider,
{
    let table = resolve_table(&args.table, data)?;
    let result = calculate_net_salary(
        args.gross_salary,
        &table.rows,
        table.column,
        &table.municipality,
        args.table.church_member,
    )?;

    Ok(NetSalaryReport {
        municipality: table.municipality.name,
        table_id: table.table_id,
        column: table.column,
        result,
    })
}

fn benefit_value<V: VehicleProvider>(
    args: &CarBenefitArgs,
    vehicles: &V,
) -> Result<Decimal> {
    if let Some(value) = args.benefit_value {
        return Ok(value);
    }

    let (Some(brand), Some(model), Some(model_year)) = (&args.brand, &args.model, args.model_year)
    else {
        bail!("pass --benefit-value, or --brand, --model and --model-year");
    };
    let vehicle = vehicles
        .find_vehicle(brand, model, model_year)
        .context("vehicle not found in reference data")?;

    let input = BenefitValueInput {
        extra_equipment: args.extra_equipment,
        ..BenefitValueInput::from_vehicle(&vehicle, args.mileage_reduction)
    };
    let value = calculate_benefit_value(&input);
    info!(
        vehicle = %format!("{} {} {}", vehicle.brand, vehicle.model, vehicle.model_year),
        benefit_value = %value,
        "computed benefit value"
    );
    Ok(value)
}

pub fn car_benefit<D>(
    args: &CarBenefitArgs,
    data: &D,
) -> Result<CarBenefitReport>
where
    D: TaxTableProvider + MunicipalRateProvider + VehicleProvider,
{
    let benefit_value = benefit_value(args, data)?;
    let table = resolve_table(&args.table, data)?;
    let model = DeductionModel::from(args.deduction_model);

    let input = CarBenefitInput {
        gross_salary: args.gross_salary,
        benefit_value,
        deduction_model: model,
        gross_deduction: args.gross_deduction,
        net_deduction: args.net_deduction,
        private_leasing: args.private_leasing,
        business_leasing: args.business_leasing,
        employer_contribution: args.employer_contribution,
    };
    let result = calculate_car_benefit(&input, &table.rows, table.column)?;
    let best_model = if args.compare {
        Some(best_deduction_model(&input, &table.rows, table.column)?)
    } else {
        None
    };

    Ok(CarBenefitReport {
        benefit_value,
        model,
        result,
        best_model,
    })
}

pub fn pension(args: &PensionArgs) -> Result<PensionReport> {
    let ibb = match args.ibb {
        Some(ibb) => ibb,
        None => income_base_amount(args.year)
            .ok_or_else(|| anyhow!("no income base amount known for {}; pass --ibb", args.year))?,
    };

    Ok(PensionReport {
        result: calculate_pension(&args.to_input(ibb)),
    })
}
