//! Monthly take-home pay from a withholding table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::saturating_div;
use crate::calculations::tax_table::{TaxColumn, TaxTableError, lookup_withholding};
use crate::models::{MunicipalRate, TaxTableEntry};

/// Net salary and the local rates behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetSalaryResult {
    pub gross_salary: Decimal,
    /// Preliminary tax withheld according to the table.
    pub tax_deduction: Decimal,
    pub net_salary: Decimal,
    /// Withheld tax as a percentage of gross salary.
    pub withholding_rate: Decimal,
    pub municipal_tax: Decimal,
    pub county_tax: Decimal,
    /// Zero unless the employee is a church member.
    pub church_tax: Decimal,
    pub total_tax_rate: Decimal,
}

/// Looks up the withholding for `gross_monthly` and reports take-home pay.
///
/// # Errors
///
/// Returns [`TaxTableError::EmptyTable`] when `table` has no rows.
pub fn calculate_net_salary(
    gross_monthly: Decimal,
    table: &[TaxTableEntry],
    column: TaxColumn,
    municipality: &MunicipalRate,
    church_member: bool,
) -> Result<NetSalaryResult, TaxTableError> {
    debug!(
        gross_monthly = %gross_monthly,
        column = column.number(),
        municipality = %municipality.name,
        "calculating net salary"
    );

    let tax_deduction = lookup_withholding(gross_monthly, table, column)?;
    let withholding_rate = if gross_monthly > Decimal::ZERO {
        saturating_div(tax_deduction, gross_monthly).saturating_mul(Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    };
    let church_tax = if church_member {
        municipality.church_tax
    } else {
        Decimal::ZERO
    };

    Ok(NetSalaryResult {
        gross_salary: gross_monthly,
        tax_deduction,
        net_salary: gross_monthly - tax_deduction,
        withholding_rate,
        municipal_tax: municipality.municipal_tax,
        county_tax: municipality.county_tax,
        church_tax,
        total_tax_rate: municipality.total_rate(church_member),
    })
}
