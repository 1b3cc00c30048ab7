use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A car model's list price and annual vehicle tax, as published for
/// benefit-value purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub brand: String,
    pub model: String,
    pub model_year: i32,
    /// New-car price excluding VAT, SEK.
    pub new_car_price: Decimal,
    /// Annual vehicle tax, SEK.
    pub vehicle_tax: Decimal,
    /// CO2 emissions in g/km.
    pub co2: Decimal,
    pub fuel: String,
}
