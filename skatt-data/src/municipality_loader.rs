use std::collections::BTreeMap;
use std::io::Read;

use serde::Deserialize;
use skatt_core::MunicipalRate;
use thiserror::Error;
use tracing::debug;

use crate::amount::parse_decimal;

/// Errors that can occur when loading municipal tax rates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MunicipalityLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid rate '{value}' for {municipality}")]
    InvalidRate { municipality: String, value: String },
}

impl From<csv::Error> for MunicipalityLoaderError {
    fn from(err: csv::Error) -> Self {
        MunicipalityLoaderError::CsvParse(err.to_string())
    }
}

/// One parish row of the municipal tax rate export.
///
/// Rates use a decimal comma. Municipalities appear once per parish; only the
/// church fee differs between a municipality's parishes.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MunicipalityRecord {
    #[serde(rename = "år", default)]
    pub year: String,
    pub kommun: String,
    #[serde(rename = "församling", default)]
    pub parish: String,
    #[serde(rename = "kommunal-skatt")]
    pub municipal_tax: String,
    #[serde(rename = "landstings-skatt")]
    pub county_tax: String,
    #[serde(rename = "kyrkoavgift", default)]
    pub church_tax: String,
    #[serde(rename = "begravnings-avgift", default)]
    pub burial_fee: String,
}

impl MunicipalityRecord {
    fn into_rate(self) -> Result<MunicipalRate, MunicipalityLoaderError> {
        let name = self.kommun.trim().to_uppercase();
        let rate = |raw: &str| {
            parse_decimal(raw).ok_or_else(|| MunicipalityLoaderError::InvalidRate {
                municipality: name.clone(),
                value: raw.to_string(),
            })
        };

        Ok(MunicipalRate {
            municipal_tax: rate(self.municipal_tax.as_str())?,
            county_tax: rate(self.county_tax.as_str())?,
            church_tax: rate(self.church_tax.as_str())?,
            burial_fee: rate(self.burial_fee.as_str())?,
            year: self.year.trim().parse().unwrap_or_default(),
            name,
        })
    }
}

/// Loader for municipal tax rates from CSV exports.
pub struct MunicipalityLoader;

impl MunicipalityLoader {
    /// Parse municipal rates from a CSV reader.
    ///
    /// Names are upper-cased and trimmed. The first parish row of each
    /// municipality wins; rows without a name are skipped. The result is
    /// sorted by name.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<MunicipalRate>, MunicipalityLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut by_name: BTreeMap<String, MunicipalRate> = BTreeMap::new();

        for result in csv_reader.deserialize() {
            let record: MunicipalityRecord = result?;
            if record.kommun.trim().is_empty() {
                debug!(parish = %record.parish, "skipping row without municipality");
                continue;
            }

            let rate = record.into_rate()?;
            by_name.entry(rate.name.clone()).or_insert(rate);
        }

        debug!(municipalities = by_name.len(), "parsed municipal rates");
        Ok(by_name.into_values().collect())
    }
}
