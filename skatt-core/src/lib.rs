pub mod calculations;
pub mod models;
pub mod providers;

pub use models::*;
pub use providers::{MunicipalRateProvider, ProviderError, TaxTableProvider, VehicleProvider};
