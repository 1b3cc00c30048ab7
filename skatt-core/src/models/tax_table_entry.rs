use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of withholding columns in a Skatteverket tax table row.
pub const TAX_TABLE_COLUMNS: usize = 7;

/// One income bracket of a monthly withholding tax table.
///
/// Rows come from the external tax-table export and are parsed into typed
/// values once, at the loader boundary. The calculations only ever read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTableEntry {
    pub year: i32,
    /// Table number, e.g. `"32"`.
    pub table_number: String,
    /// Period code from the export (`"30B"` for the monthly table).
    pub period: String,
    pub income_from: Decimal,
    pub income_to: Decimal,
    /// Withholding amount per income-category column, column 1 first.
    pub withholding: [Decimal; TAX_TABLE_COLUMNS],
}

impl TaxTableEntry {
    /// Whether `income` falls inside this bracket (both bounds inclusive).
    pub fn contains(
        &self,
        income: Decimal,
    ) -> bool {
        self.income_from <= income && income <= self.income_to
    }
}
