use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use skatt_core::{TAX_TABLE_COLUMNS, TaxTableEntry};
use thiserror::Error;
use tracing::debug;

use crate::amount::parse_amount;

/// Errors that can occur when loading withholding tables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid amount '{value}' in column '{column}'")]
    InvalidAmount { column: &'static str, value: String },

    #[error("Invalid year '{0}'")]
    InvalidYear(String),
}

impl From<csv::Error> for TaxTableLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of Skatteverket's monthly tax table export.
///
/// Every cell is kept as text; amounts are parsed when the row is converted
/// into a [`TaxTableEntry`].
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxTableRecord {
    #[serde(rename = "år")]
    pub year: String,
    #[serde(rename = "tabellnr")]
    pub table_number: String,
    #[serde(rename = "antal dgr")]
    pub period: String,
    #[serde(rename = "inkomst fr.o.m.")]
    pub income_from: String,
    #[serde(rename = "inkomst t.o.m.")]
    pub income_to: String,
    #[serde(rename = "kolumn 1")]
    pub column_1: String,
    #[serde(rename = "kolumn 2")]
    pub column_2: String,
    #[serde(rename = "kolumn 3")]
    pub column_3: String,
    #[serde(rename = "kolumn 4")]
    pub column_4: String,
    #[serde(rename = "kolumn 5")]
    pub column_5: String,
    #[serde(rename = "kolumn 6")]
    pub column_6: String,
    #[serde(rename = "kolumn 7", default)]
    pub column_7: String,
}

impl TryFrom<TaxTableRecord> for TaxTableEntry {
    type Error = TaxTableLoaderError;

    fn try_from(record: TaxTableRecord) -> Result<Self, Self::Error> {
        let year = record
            .year
            .trim()
            .parse::<i32>()
            .map_err(|_| TaxTableLoaderError::InvalidYear(record.year.clone()))?;

        let columns: [(&'static str, &str); TAX_TABLE_COLUMNS] = [
            ("kolumn 1", record.column_1.as_str()),
            ("kolumn 2", record.column_2.as_str()),
            ("kolumn 3", record.column_3.as_str()),
            ("kolumn 4", record.column_4.as_str()),
            ("kolumn 5", record.column_5.as_str()),
            ("kolumn 6", record.column_6.as_str()),
            ("kolumn 7", record.column_7.as_str()),
        ];
        let mut withholding = [Decimal::ZERO; TAX_TABLE_COLUMNS];
        for (slot, (column, raw)) in withholding.iter_mut().zip(columns) {
            *slot = amount(column, raw)?;
        }

        Ok(TaxTableEntry {
            year,
            table_number: record.table_number.trim().to_string(),
            period: record.period.trim().to_string(),
            income_from: amount("inkomst fr.o.m.", &record.income_from)?,
            income_to: amount("inkomst t.o.m.", &record.income_to)?,
            withholding,
        })
    }
}

fn amount(
    column: &'static str,
    raw: &str,
) -> Result<Decimal, TaxTableLoaderError> {
    parse_amount(raw).ok_or_else(|| TaxTableLoaderError::InvalidAmount {
        column,
        value: raw.to_string(),
    })
}

/// Loader for withholding tables from CSV exports.
///
/// A single file may hold several tables and years. Rows are returned sorted
/// by year, table and ascending income so each table is ready for lookup.
pub struct TaxTableLoader;

impl TaxTableLoader {
    /// Parse tax table rows from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxTableEntry>, TaxTableLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut entries = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxTableRecord = result?;
            entries.push(TaxTableEntry::try_from(record)?);
        }

        entries.sort_by(|a, b| {
            (a.year, &a.table_number, a.income_from).cmp(&(b.year, &b.table_number, b.income_from))
        });
        debug!(rows = entries.len(), "parsed tax table rows");

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const HEADER: &str = "år,tabellnr,antal dgr,inkomst fr.o.m.,inkomst t.o.m.,kolumn 1,kolumn 2,kolumn 3,kolumn 4,kolumn 5,kolumn 6,kolumn 7";

    fn csv(rows: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn parse_single_row() {
        let data = csv(&["2025,30,30B,20001,20200,3910,3120,3520,3960,4380,4380,4480"]);

        let entries = TaxTableLoader::parse(data.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            entries,
            vec![TaxTableEntry {
                year: 2025,
                table_number: "30".to_string(),
                period: "30B".to_string(),
                income_from: dec!(20001),
                income_to: dec!(20200),
                withholding: [
                    dec!(3910),
                    dec!(3120),
                    dec!(3520),
                    dec!(3960),
                    dec!(4380),
                    dec!(4380),
                    dec!(4480),
                ],
            }]
        );
    }

    #[test]
    fn parse_strips_thousands_separators() {
        let data = csv(&[r#"2025,30,30B,"1 000 001","1 000 200","512 345",0,0,0,0,0,0"#]);

        let entries = TaxTableLoader::parse(data.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(entries[0].income_from, dec!(1000001));
        assert_eq!(entries[0].withholding[0], dec!(512345));
    }

    #[test]
    fn parse_sorts_rows_by_income() {
        let data = csv(&[
            "2025,30,30B,20201,20400,3970,0,0,0,0,0,0",
            "2025,30,30B,20001,20200,3910,0,0,0,0,0,0",
        ]);

        let entries = TaxTableLoader::parse(data.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(entries[0].income_from, dec!(20001));
        assert_eq!(entries[1].income_from, dec!(20201));
    }

    #[test]
    fn missing_seventh_column_reads_as_zero() {
        let data = "år,tabellnr,antal dgr,inkomst fr.o.m.,inkomst t.o.m.,kolumn 1,kolumn 2,kolumn 3,kolumn 4,kolumn 5,kolumn 6\n2025,30,30B,20001,20200,3910,3120,3520,3960,4380,4380";

        let entries = TaxTableLoader::parse(data.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(entries[0].withholding[6], Decimal::ZERO);
    }

    #[test]
    fn parse_rejects_missing_column() {
        let data = "år,tabellnr\n2025,30";

        let err = TaxTableLoader::parse(data.as_bytes()).expect_err("Should fail for missing column");

        let TaxTableLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.contains("missing field"),
            "Expected 'missing field' in error, got: {}",
            msg
        );
    }

    #[test]
    fn parse_rejects_garbled_amount() {
        let data = csv(&["2025,30,30B,20001,20200,39-10,0,0,0,0,0,0"]);

        let result = TaxTableLoader::parse(data.as_bytes());

        assert_eq!(
            result,
            Err(TaxTableLoaderError::InvalidAmount {
                column: "kolumn 1",
                value: "39-10".to_string(),
            })
        );
    }

    #[test]
    fn parse_rejects_bad_year() {
        let data = csv(&["tjugo,30,30B,20001,20200,3910,0,0,0,0,0,0"]);

        let result = TaxTableLoader::parse(data.as_bytes());

        assert_eq!(result, Err(TaxTableLoaderError::InvalidYear("tjugo".to_string())));
    }
}
