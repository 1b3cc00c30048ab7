use std::io::Read;

use serde::Deserialize;
use skatt_core::VehicleRecord;
use thiserror::Error;
use tracing::debug;

use crate::amount::parse_decimal;

/// Errors that can occur when loading vehicle prices.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VehicleLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid value '{value}' in column '{column}' for {brand} {model}")]
    InvalidValue {
        brand: String,
        model: String,
        column: &'static str,
        value: String,
    },
}

impl From<csv::Error> for VehicleLoaderError {
    fn from(err: csv::Error) -> Self {
        VehicleLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of the new-car price list.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VehicleCsvRecord {
    #[serde(rename = "Fabrikat")]
    pub brand: String,
    #[serde(rename = "Modell")]
    pub model: String,
    #[serde(rename = "Modellår")]
    pub model_year: String,
    #[serde(rename = "Nybilspris exkl moms")]
    pub new_car_price: String,
    #[serde(rename = "Fordonsskatt", default)]
    pub vehicle_tax: String,
    #[serde(rename = "CO2-utsläpp", default)]
    pub co2: String,
    #[serde(rename = "Drivmedel", default)]
    pub fuel: String,
}

impl VehicleCsvRecord {
    fn into_vehicle(self) -> Result<VehicleRecord, VehicleLoaderError> {
        let brand = self.brand.trim().to_string();
        let model = self.model.trim().to_string();
        let invalid = |column: &'static str, raw: &str| VehicleLoaderError::InvalidValue {
            brand: brand.clone(),
            model: model.clone(),
            column,
            value: raw.to_string(),
        };
        let value = |column: &'static str, raw: &str| {
            parse_decimal(raw).ok_or_else(|| invalid(column, raw))
        };

        let model_year = self
            .model_year
            .trim()
            .parse::<i32>()
            .map_err(|_| invalid("Modellår", self.model_year.as_str()))?;
        let new_car_price = value("Nybilspris exkl moms", self.new_car_price.as_str())?;
        let vehicle_tax = value("Fordonsskatt", self.vehicle_tax.as_str())?;
        let co2 = value("CO2-utsläpp", self.co2.as_str())?;

        Ok(VehicleRecord {
            brand,
            model,
            model_year,
            new_car_price,
            vehicle_tax,
            co2,
            fuel: self.fuel.trim().to_string(),
        })
    }
}

/// Loader for the new-car price list used for benefit values.
pub struct VehicleLoader;

impl VehicleLoader {
    /// Parse vehicle records from a CSV reader.
    ///
    /// Rows missing a brand or model are skipped.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<VehicleRecord>, VehicleLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut vehicles = Vec::new();

        for result in csv_reader.deserialize() {
            let record: VehicleCsvRecord = result?;
            if record.brand.trim().is_empty() || record.model.trim().is_empty() {
                debug!(brand = %record.brand, model = %record.model, "skipping incomplete vehicle row");
                continue;
            }
            vehicles.push(record.into_vehicle()?);
        }

        debug!(vehicles = vehicles.len(), "parsed vehicle records");
        Ok(vehicles)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;

    const HEADER: &str =
        "Fabrikat,Modell,Modellår,Nybilspris exkl moms,Fordonsskatt,CO2-utsläpp,Drivmedel";

    #[test]
    fn parse_single_vehicle() {
        let data = format!("{HEADER}\nVOLVO,XC40 Recharge,2024,\"452 000\",360,0,El");

        let vehicles = VehicleLoader::parse(data.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            vehicles,
            vec![VehicleRecord {
                brand: "VOLVO".to_string(),
                model: "XC40 Recharge".to_string(),
                model_year: 2024,
                new_car_price: dec!(452000),
                vehicle_tax: dec!(360),
                co2: dec!(0),
                fuel: "El".to_string(),
            }]
        );
    }

    #[test]
    fn incomplete_rows_are_skipped() {
        let data = format!("{HEADER}\nVOLVO,,2024,452000,360,0,El\n,XC60,2024,600000,1200,30,Bensin");

        let vehicles = VehicleLoader::parse(data.as_bytes()).expect("Failed to parse CSV");

        assert!(vehicles.is_empty());
    }

    #[test]
    fn missing_optional_cells_read_as_zero() {
        let data = format!("{HEADER}\nKIA,EV6,2023,480000,,,");

        let vehicles = VehicleLoader::parse(data.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(vehicles[0].vehicle_tax, Decimal::ZERO);
        assert_eq!(vehicles[0].fuel, "");
    }

    #[test]
    fn invalid_price_is_reported() {
        let data = format!("{HEADER}\nKIA,EV6,2023,4.8.0,360,0,El");

        let result = VehicleLoader::parse(data.as_bytes());

        assert_eq!(
            result,
            Err(VehicleLoaderError::InvalidValue {
                brand: "KIA".to_string(),
                model: "EV6".to_string(),
                column: "Nybilspris exkl moms",
                value: "4.8.0".to_string(),
            })
        );
    }
}
