//! Withholding lookup in Skatteverket's monthly tax tables.
//!
//! A tax table is a flat list of income brackets. Each bracket carries one
//! withholding amount per income-category column (salary, pension, sickness
//! compensation and so on). Looking up an income picks the bracket containing
//! it; incomes below the table are untaxed and incomes above it saturate at
//! the top bracket.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use skatt_core::TaxTableEntry;
//! use skatt_core::calculations::{TaxColumn, lookup_withholding};
//!
//! let row = |from, to, tax| TaxTableEntry {
//!     year: 2025,
//!     table_number: "32".to_string(),
//!     period: "30B".to_string(),
//!     income_from: from,
//!     income_to: to,
//!     withholding: [tax; 7],
//! };
//! let table = vec![
//!     row(dec!(20001), dec!(20200), dec!(3910)),
//!     row(dec!(20201), dec!(20400), dec!(3970)),
//! ];
//!
//! let tax = lookup_withholding(dec!(20300), &table, TaxColumn::SALARY).unwrap();
//! assert_eq!(tax, dec!(3970));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::{TAX_TABLE_COLUMNS, TaxTableEntry};

/// Errors that can occur when reading a tax table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxTableError {
    /// The caller passed a table without any brackets.
    #[error("tax table has no brackets")]
    EmptyTable,

    /// Tax tables have columns 1 through 7.
    #[error("tax table column must be between 1 and 7, got {0}")]
    InvalidColumn(u8),
}

/// A validated tax table column, 1 through 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TaxColumn(u8);

impl TaxColumn {
    /// Salaries for people under 66 at the start of the year.
    pub const SALARY: TaxColumn = TaxColumn(1);

    /// Creates a column, rejecting numbers outside 1..=7.
    pub fn new(number: u8) -> Result<Self, TaxTableError> {
        if (1..=TAX_TABLE_COLUMNS as u8).contains(&number) {
            Ok(Self(number))
        } else {
            Err(TaxTableError::InvalidColumn(number))
        }
    }

    /// The 1-based column number.
    pub fn number(self) -> u8 {
        self.0
    }

    /// The income category the column applies to.
    pub fn description(self) -> &'static str {
        match self.0 {
            1 => "Salary, under 66 at start of year (earned income tax credit)",
            2 => "Pension, 66 or older at start of year",
            3 => "Salary, 66 or older at start of year (raised earned income tax credit)",
            4 => "Sickness or activity compensation, under 66",
            5 => "Unemployment insurance and similar benefits",
            6 => "Pension, under 66 at start of year",
            _ => "Other income without earned income tax credit",
        }
    }

    fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u8> for TaxColumn {
    type Error = TaxTableError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::new(number)
    }
}

impl From<TaxColumn> for u8 {
    fn from(column: TaxColumn) -> Self {
        column.0
    }
}

/// Returns the withholding for `gross_income` in `column` of `table`.
///
/// Rows are expected in ascending income order. The first bracket whose
/// inclusive range contains the income wins. Incomes below the first bracket
/// yield zero. An income between two whole-krona brackets takes the bracket
/// below it, and incomes beyond every bracket take the last row's amount.
///
/// # Errors
///
/// Returns [`TaxTableError::EmptyTable`] when `table` has no rows.
pub fn lookup_withholding(
    gross_income: Decimal,
    table: &[TaxTableEntry],
    column: TaxColumn,
) -> Result<Decimal, TaxTableError> {
    let Some(first) = table.first() else {
        return Err(TaxTableError::EmptyTable);
    };

    if let Some(entry) = table.iter().find(|entry| entry.contains(gross_income)) {
        return Ok(entry.withholding[column.index()]);
    }

    if gross_income < first.income_from {
        return Ok(Decimal::ZERO);
    }

    let below = table
        .iter()
        .rev()
        .find(|entry| entry.income_from <= gross_income)
        .unwrap_or(first);
    debug!(
        gross_income = %gross_income,
        bracket_from = %below.income_from,
        bracket_to = %below.income_to,
        "income not inside any bracket; using the nearest bracket below"
    );
    Ok(below.withholding[column.index()])
}
