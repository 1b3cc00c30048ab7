mod fiscal_year;
mod global_settings;
mod municipal_rate;
mod tax_table_entry;
mod vehicle;
mod year_plan;

pub use fiscal_year::{DividendRules, income_base_amount};
pub use global_settings::{
    GlobalSettings, GlobalSettingsInput, MAX_PLANNING_YEARS, PayrollBase, SettingsError,
};
pub use municipal_rate::MunicipalRate;
pub use tax_table_entry::{TAX_TABLE_COLUMNS, TaxTableEntry};
pub use vehicle::VehicleRecord;
pub use year_plan::{YearCalculation, YearInput};
