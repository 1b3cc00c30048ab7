//! Monthly taxable value (förmånsvärde) of a company car.
//!
//! The value here is the simplified price-based rule: 9 % of the new-car
//! price including extra equipment, plus the vehicle tax, spread over twelve
//! months. Driving at least 3 000 mil in service reduces it by a quarter.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{non_negative, percent_of, round_to_krona};
use crate::models::VehicleRecord;

const PRICE_RATE: Decimal = Decimal::from_parts(9, 0, 0, false, 0);
const MILEAGE_REDUCTION_FACTOR: Decimal = Decimal::from_parts(75, 0, 0, false, 2);
const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BenefitValueInput {
    /// New-car price excluding VAT, SEK.
    pub new_car_price: Decimal,
    /// Annual vehicle tax, SEK.
    pub vehicle_tax: Decimal,
    pub extra_equipment: Decimal,
    /// At least 3 000 mil driven in service during the year.
    pub mileage_reduction: bool,
}

impl BenefitValueInput {
    /// Input for a listed vehicle, with no extra equipment.
    pub fn from_vehicle(
        vehicle: &VehicleRecord,
        mileage_reduction: bool,
    ) -> Self {
        Self {
            new_car_price: vehicle.new_car_price,
            vehicle_tax: vehicle.vehicle_tax,
            extra_equipment: Decimal::ZERO,
            mileage_reduction,
        }
    }
}

/// Monthly benefit value in whole SEK.
///
/// ```
/// use rust_decimal_macros::dec;
/// use skatt_core::calculations::{BenefitValueInput, calculate_benefit_value};
///
/// let input = BenefitValueInput {
///     new_car_price: dec!(400000),
///     vehicle_tax: dec!(360),
///     extra_equipment: dec!(0),
///     mileage_reduction: false,
/// };
///
/// assert_eq!(calculate_benefit_value(&input), dec!(3030));
/// ```
pub fn calculate_benefit_value(input: &BenefitValueInput) -> Decimal {
    let price = non_negative(input.new_car_price) + non_negative(input.extra_equipment);
    let mut monthly = percent_of(price, PRICE_RATE) / MONTHS_PER_YEAR
        + non_negative(input.vehicle_tax) / MONTHS_PER_YEAR;

    if input.mileage_reduction {
        monthly *= MILEAGE_REDUCTION_FACTOR;
    }

    round_to_krona(monthly)
}
