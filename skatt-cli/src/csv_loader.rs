//! CSV loader for the yearly inputs of a dividend plan.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Every
//! column is optional; an empty cell or a missing column takes the value of
//! [`YearInput::default`].
//!
//! | Column                 | Type    | Notes                              |
//! |------------------------|---------|------------------------------------|
//! | `hourly_rate`          | decimal | SEK per billed hour, excl. VAT     |
//! | `hours_per_month`      | decimal | billed hours per month             |
//! | `gross_salary_monthly` | decimal | owner's gross salary, SEK          |
//! | `other_costs_monthly`  | decimal | SEK                                |
//! | `buffer_percent`       | decimal | percent of the pre-buffer surplus  |
//! | `dividend_percent`     | decimal | percent of the distributable equity |
//!
//! A leading `year` column is accepted and ignored; rows are taken in file
//! order as year 1, 2, 3 and so on.
//!
//! ### Example
//!
//! ```csv
//! year,hourly_rate,gross_salary_monthly,dividend_percent
//! 1,850,55000,50
//! 2,900,,100
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use skatt_core::YearInput;

#[derive(Debug, Deserialize)]
struct CsvRow {
    hourly_rate: Option<Decimal>,
    hours_per_month: Option<Decimal>,
    gross_salary_monthly: Option<Decimal>,
    other_costs_monthly: Option<Decimal>,
    buffer_percent: Option<Decimal>,
    dividend_percent: Option<Decimal>,
}

/// Errors that can occur while loading yearly inputs from CSV.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bad structure or a value that is not a number.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A SEK amount or percentage was negative. `row` is 1-based.
    #[error("negative {column} on row {row}")]
    NegativeValue { column: &'static str, row: usize },
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<YearInput, CsvLoadError> {
    let defaults = YearInput::default();
    let pick = |column: &'static str, value: Option<Decimal>, default: Decimal| {
        let value = value.unwrap_or(default);
        if value < Decimal::ZERO {
            Err(CsvLoadError::NegativeValue {
                column,
                row: row_number,
            })
        } else {
            Ok(value)
        }
    };

    Ok(YearInput {
        hourly_rate: pick("hourly_rate", row.hourly_rate, defaults.hourly_rate)?,
        hours_per_month: pick("hours_per_month", row.hours_per_month, defaults.hours_per_month)?,
        gross_salary_monthly: pick(
            "gross_salary_monthly",
            row.gross_salary_monthly,
            defaults.gross_salary_monthly,
        )?,
        other_costs_monthly: pick(
            "other_costs_monthly",
            row.other_costs_monthly,
            defaults.other_costs_monthly,
        )?,
        buffer_percent: pick("buffer_percent", row.buffer_percent, defaults.buffer_percent)?,
        dividend_percent: pick(
            "dividend_percent",
            row.dividend_percent,
            defaults.dividend_percent,
        )?,
    })
}

/// Parses CSV text into yearly inputs, in file order.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is malformed or a cell is not a number.
/// * [`CsvLoadError::NegativeValue`] if any value is below zero.
pub fn load_from_str(input: &str) -> Result<Vec<YearInput>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| convert_row(result?, idx + 1))
        .collect()
}

/// Reads `path` and delegates to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<YearInput>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    // -----------------------------------------------------------------------
    // Fixtures
    // -----------------------------------------------------------------------
    const FULL_CSV: &str = "\
hourly_rate,hours_per_month,gross_salary_monthly,other_costs_monthly,buffer_percent,dividend_percent
850,140,55000,12000,15,50
";

    const PARTIAL_CSV: &str = "\
year,hourly_rate,dividend_percent
1,800,
2,900,100
";

    #[test]
    fn test_full_row_populates_every_field() {
        let years = load_from_str(FULL_CSV).expect("should parse full CSV");

        assert_eq!(
            years,
            vec![YearInput {
                hourly_rate: dec!(850),
                hours_per_month: dec!(140),
                gross_salary_monthly: dec!(55000),
                other_costs_monthly: dec!(12000),
                buffer_percent: dec!(15),
                dividend_percent: dec!(50),
            }]
        );
    }

    #[test]
    fn test_missing_cells_take_year_defaults() {
        let years = load_from_str(PARTIAL_CSV).expect("should parse partial CSV");
        let defaults = YearInput::default();

        assert_eq!(years.len(), 2);
        assert_eq!(years[0].hourly_rate, dec!(800));
        assert_eq!(years[0].dividend_percent, defaults.dividend_percent);
        assert_eq!(years[0].gross_salary_monthly, defaults.gross_salary_monthly);
        assert_eq!(years[1].dividend_percent, dec!(100));
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let csv = "dividend_percent,hourly_rate\n30,700\n";

        let years = load_from_str(csv).expect("column order should not matter");

        assert_eq!(years[0].hourly_rate, dec!(700));
        assert_eq!(years[0].dividend_percent, dec!(30));
    }

    #[test]
    fn test_whitespace_around_values_is_trimmed() {
        let csv = "hourly_rate , hours_per_month\n 950 , 120.5 \n";

        let years = load_from_str(csv).expect("should tolerate surrounding whitespace");

        assert_eq!(years[0].hourly_rate, dec!(950));
        assert_eq!(years[0].hours_per_month, dec!(120.5));
    }

    #[test]
    fn test_header_only_yields_no_years() {
        let years = load_from_str("hourly_rate,dividend_percent\n").expect("header-only CSV");

        assert!(years.is_empty());
    }

    #[test]
    fn test_non_numeric_value_returns_parse_error() {
        let result = load_from_str("hourly_rate\nexpensive\n");

        match result {
            Err(CsvLoadError::Parse(_)) => {}
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_value_reports_row() {
        let csv = "hourly_rate,other_costs_monthly\n800,1000\n800,-1\n";

        match load_from_str(csv) {
            Err(CsvLoadError::NegativeValue { column, row }) => {
                assert_eq!(column, "other_costs_monthly");
                assert_eq!(row, 2);
            }
            other => panic!("expected NegativeValue, got {:?}", other),
        }
    }
}
