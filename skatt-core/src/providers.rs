//! Reference-data collaborators the calculators are fed from.
//!
//! Implementations own fetching, parsing and caching. Everything they return
//! is already typed, so the calculators never parse strings.

use thiserror::Error;

use crate::models::{MunicipalRate, TaxTableEntry, VehicleRecord};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid reference data: {0}")]
    Parse(String),
}

/// Source of monthly withholding tables.
pub trait TaxTableProvider: Send + Sync {
    /// Rows of table `table_id` for `year`, sorted by ascending income and
    /// never empty.
    fn tax_table(
        &self,
        year: i32,
        table_id: &str,
    ) -> Result<Vec<TaxTableEntry>, ProviderError>;
}

/// Source of local tax rates per municipality.
pub trait MunicipalRateProvider: Send + Sync {
    /// Looks up a municipality by name, ignoring case.
    fn municipality(
        &self,
        name: &str,
    ) -> Result<MunicipalRate, ProviderError>;

    fn municipalities(&self) -> Vec<MunicipalRate>;
}

/// Source of list prices used for car benefit values.
pub trait VehicleProvider: Send + Sync {
    fn find_vehicle(
        &self,
        brand: &str,
        model: &str,
        model_year: i32,
    ) -> Result<VehicleRecord, ProviderError>;
}
