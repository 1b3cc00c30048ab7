use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use skatt_core::{
    MunicipalRate, MunicipalRateProvider, ProviderError, TaxTableEntry, TaxTableProvider,
    VehicleProvider, VehicleRecord,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::municipality_loader::{MunicipalityLoader, MunicipalityLoaderError};
use crate::tax_table_loader::{TaxTableLoader, TaxTableLoaderError};
use crate::vehicle_loader::{VehicleLoader, VehicleLoaderError};

/// File names looked for by [`ReferenceData::from_dir`].
pub const TAX_TABLES_FILE: &str = "tax_tables.csv";
pub const MUNICIPALITIES_FILE: &str = "municipalities.csv";
pub const VEHICLES_FILE: &str = "vehicles.csv";

#[derive(Debug, Error)]
pub enum ReferenceDataError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Tax tables: {0}")]
    TaxTable(#[from] TaxTableLoaderError),

    #[error("Municipalities: {0}")]
    Municipality(#[from] MunicipalityLoaderError),

    #[error("Vehicles: {0}")]
    Vehicle(#[from] VehicleLoaderError),
}

/// In-memory reference data loaded from CSV exports.
///
/// Tax tables are grouped by year and table number. Any of the three data
/// sets may be empty; lookups against an empty set report `NotFound`.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    tax_tables: HashMap<(i32, String), Vec<TaxTableEntry>>,
    municipalities: Vec<MunicipalRate>,
    vehicles: Vec<VehicleRecord>,
}

impl ReferenceData {
    pub fn new(
        tax_table_rows: Vec<TaxTableEntry>,
        municipalities: Vec<MunicipalRate>,
        vehicles: Vec<VehicleRecord>,
    ) -> Self {
        let mut tax_tables: HashMap<(i32, String), Vec<TaxTableEntry>> = HashMap::new();
        for row in tax_table_rows {
            tax_tables
                .entry((row.year, row.table_number.clone()))
                .or_default()
                .push(row);
        }
        for rows in tax_tables.values_mut() {
            rows.sort_by(|a, b| a.income_from.cmp(&b.income_from));
        }

        Self {
            tax_tables,
            municipalities,
            vehicles,
        }
    }

    /// Loads whichever of `tax_tables.csv`, `municipalities.csv` and
    /// `vehicles.csv` exist in `dir`.
    ///
    /// # Errors
    ///
    /// Fails if a present file cannot be opened or parsed.
    pub fn from_dir(dir: &Path) -> Result<Self, ReferenceDataError> {
        let tax_table_rows = match open_optional(&dir.join(TAX_TABLES_FILE))? {
            Some(file) => TaxTableLoader::parse(file)?,
            None => Vec::new(),
        };
        let municipalities = match open_optional(&dir.join(MUNICIPALITIES_FILE))? {
            Some(file) => MunicipalityLoader::parse(file)?,
            None => Vec::new(),
        };
        let vehicles = match open_optional(&dir.join(VEHICLES_FILE))? {
            Some(file) => VehicleLoader::parse(file)?,
            None => Vec::new(),
        };

        info!(
            dir = %dir.display(),
            tax_table_rows = tax_table_rows.len(),
            municipalities = municipalities.len(),
            vehicles = vehicles.len(),
            "loaded reference data"
        );
        Ok(Self::new(tax_table_rows, municipalities, vehicles))
    }

    pub fn vehicles(&self) -> &[VehicleRecord] {
        &self.vehicles
    }
}

fn open_optional(path: &Path) -> Result<Option<File>, ReferenceDataError> {
    match File::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "reference file not present");
            Ok(None)
        }
        Err(source) => Err(ReferenceDataError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl TaxTableProvider for ReferenceData {
    /// Church-member tables (`"31B"`) fall back to the plain table (`"31"`)
    /// when the data holds no separate variant.
    fn tax_table(
        &self,
        year: i32,
        table_id: &str,
    ) -> Result<Vec<TaxTableEntry>, ProviderError> {
        let table_id = table_id.trim();
        if let Some(rows) = self.tax_tables.get(&(year, table_id.to_string())) {
            return Ok(rows.clone());
        }

        if let Some(base) = table_id.strip_suffix(['B', 'b']) {
            if let Some(rows) = self.tax_tables.get(&(year, base.to_string())) {
                debug!(table_id, base, "church table missing; using base table");
                return Ok(rows.clone());
            }
        }

        Err(ProviderError::NotFound(format!("tax table {table_id} for {year}")))
    }
}

impl MunicipalRateProvider for ReferenceData {
    fn municipality(
        &self,
        name: &str,
    ) -> Result<MunicipalRate, ProviderError> {
        let wanted = name.trim().to_uppercase();
        self.municipalities
            .iter()
            .find(|m| m.name == wanted)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("municipality {wanted}")))
    }

    fn municipalities(&self) -> Vec<MunicipalRate> {
        self.municipalities.clone()
    }
}

impl VehicleProvider for ReferenceData {
    /// Matches brand and model case-insensitively.
    fn find_vehicle(
        &self,
        brand: &str,
        model: &str,
        model_year: i32,
    ) -> Result<VehicleRecord, ProviderError> {
        self.vehicles
            .iter()
            .find(|v| {
                v.model_year == model_year
                    && v.brand.eq_ignore_ascii_case(brand.trim())
                    && v.model.eq_ignore_ascii_case(model.trim())
            })
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("{brand} {model} {model_year}")))
    }
}
