use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Local income tax rates for one municipality, in percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MunicipalRate {
    /// Upper-cased municipality name, e.g. `"STOCKHOLM"`.
    pub name: String,
    pub municipal_tax: Decimal,
    pub county_tax: Decimal,
    pub church_tax: Decimal,
    pub burial_fee: Decimal,
    pub year: i32,
}

impl MunicipalRate {
    /// Combined local rate, with the church fee only for members.
    pub fn total_rate(
        &self,
        church_member: bool,
    ) -> Decimal {
        let church = if church_member {
            self.church_tax
        } else {
            Decimal::ZERO
        };
        self.municipal_tax + self.county_tax + church
    }

    /// Identifier of the withholding table matching this municipality.
    ///
    /// Tables are numbered by the whole-percent local rate. Church members use
    /// the `B` variant of the table.
    pub fn table_id(
        &self,
        church_member: bool,
    ) -> String {
        let base = self
            .total_rate(church_member)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        if church_member {
            format!("{base}B")
        } else {
            base.to_string()
        }
    }
}
