//! TOML plan files.
//!
//! ```toml
//! [settings]
//! municipality = "Stockholm"
//! number_of_years = 3
//! rules_year = 2025
//!
//! [[years]]
//! hourly_rate = 850
//! gross_salary_monthly = 55000
//! dividend_percent = 50
//! ```
//!
//! Every field is optional. Missing years repeat the last one given.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use skatt_core::calculations::align_year_inputs;
use skatt_core::{
    GlobalSettings, GlobalSettingsInput, MunicipalRateProvider, ProviderError, SettingsError,
    YearInput,
};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum PlanFileError {
    #[error("cannot read plan file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid plan file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("municipality lookup failed: {0}")]
    Municipality(#[from] ProviderError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanFile {
    pub settings: GlobalSettingsInput,
    pub years: Vec<YearInput>,
}

impl PlanFile {
    pub fn parse(contents: &str) -> Result<Self, PlanFileError> {
        let plan: PlanFile = toml::from_str(contents)?;
        debug!(years = plan.years.len(), "parsed plan file");
        Ok(plan)
    }

    pub fn load(path: &Path) -> Result<Self, PlanFileError> {
        let contents = fs::read_to_string(path).map_err(|source| PlanFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Fills in local tax rates from reference data when the file names a
    /// municipality but gives no municipal rate of its own.
    pub fn apply_municipality<P: MunicipalRateProvider + ?Sized>(
        &mut self,
        provider: &P,
    ) -> Result<(), PlanFileError> {
        if !self.needs_municipal_rates() {
            return Ok(());
        }
        let Some(name) = self.settings.municipality.as_deref() else {
            return Ok(());
        };

        let rate = provider.municipality(name)?;
        info!(
            municipality = %rate.name,
            municipal_tax = %rate.municipal_tax,
            county_tax = %rate.county_tax,
            "using municipal rates from reference data"
        );
        self.settings.municipal_tax = Some(rate.municipal_tax);
        self.settings.county_tax = self.settings.county_tax.or(Some(rate.county_tax));
        self.settings.church_tax = self.settings.church_tax.or(Some(rate.church_tax));
        Ok(())
    }

    /// True when the file names a municipality but gives no municipal tax,
    /// so the rates have to come from reference data.
    pub fn needs_municipal_rates(&self) -> bool {
        self.settings.municipality.is_some() && self.settings.municipal_tax.is_none()
    }

    /// Normalizes the settings and stretches or trims the years to match
    /// `number_of_years`.
    pub fn into_plan(self) -> Result<(GlobalSettings, Vec<YearInput>), PlanFileError> {
        let settings = GlobalSettings::try_from(self.settings)?;
        let years = align_year_inputs(self.years, settings.number_of_years as usize);
        Ok((settings, years))
    }
}
