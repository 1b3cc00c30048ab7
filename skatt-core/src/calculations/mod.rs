//! Salary, dividend and company-car calculators for Swedish owner-operators.
//!
//! Every calculator is a pure function of its inputs. Tax-table lookups fail
//! on an empty table; everything else clamps degenerate input instead of
//! returning an error.

mod car_benefit_value;
pub mod common;
mod company_car;
mod dividend;
mod hourly_rate;
mod net_salary;
mod pension;
mod plan;
mod tax_table;

pub use car_benefit_value::{BenefitValueInput, calculate_benefit_value};
pub use company_car::{
    CarBenefitInput, CarBenefitResult, DeductionModel, best_deduction_model, calculate_car_benefit,
};
pub use dividend::calculate_year;
pub use hourly_rate::{
    HourlyRateInput, HourlyRateResult, SCENARIO_HOURS, VAT_MULTIPLIER, hourly_rate_scenarios,
    solve_hourly_rate,
};
pub use net_salary::{NetSalaryResult, calculate_net_salary};
pub use pension::{PENSION_THRESHOLD_IBB_MULTIPLIER, PensionInput, PensionResult, calculate_pension};
pub use plan::{PlanSummary, align_year_inputs, calculate_all_years};
pub use tax_table::{TaxColumn, TaxTableError, lookup_withholding};
