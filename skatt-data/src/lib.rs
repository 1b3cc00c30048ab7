//! CSV loaders for Skatteverket reference data.
//!
//! Withholding tables, municipal tax rates and new-car prices are parsed once
//! into typed records and served through the `skatt-core` provider traits.

mod amount;
mod municipality_loader;
mod reference_data;
mod tax_table_loader;
mod vehicle_loader;

pub use municipality_loader::{MunicipalityLoader, MunicipalityLoaderError, MunicipalityRecord};
pub use reference_data::{
    MUNICIPALITIES_FILE, ReferenceData, ReferenceDataError, TAX_TABLES_FILE, VEHICLES_FILE,
};
pub use tax_table_loader::{TaxTableLoader, TaxTableLoaderError, TaxTableRecord};
pub use vehicle_loader::{VehicleCsvRecord, VehicleLoader, VehicleLoaderError};
