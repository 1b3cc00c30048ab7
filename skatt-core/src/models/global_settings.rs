//! Planning-session settings and their normalization boundary.
//!
//! [`GlobalSettingsInput`] is the loose shape that arrives from a config file
//! or a form: every field optional, several alternative spellings accepted.
//! [`GlobalSettings`] is what the calculations consume. The conversion
//! between them resolves every default and fallback exactly once.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DividendRules, income_base_amount};

/// Highest number of fiscal years a plan can cover.
pub const MAX_PLANNING_YEARS: u32 = 10;

/// Errors raised while normalizing settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// A percentage field was negative.
    #[error("{field} must be a non-negative percentage, got {value}")]
    NegativeRate { field: &'static str, value: Decimal },

    /// A SEK amount was negative.
    #[error("{field} must be a non-negative amount, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// The number of planned years is outside 1..=10.
    #[error("number of years must be between 1 and {MAX_PLANNING_YEARS}, got {0}")]
    InvalidNumberOfYears(u32),

    /// The income base amount must be positive.
    #[error("income base amount must be positive, got {0}")]
    InvalidIncomeBaseAmount(Decimal),

    /// No dividend rules are published for the requested year.
    #[error("no dividend rules known for year {0}")]
    UnknownRulesYear(i32),

    /// The rules year needs the previous year's income base amount, and none
    /// is published for it. Pass `ibb` explicitly.
    #[error("no income base amount known for year {0}")]
    UnknownIncomeBaseAmount(i32),

    /// A dividend-rule constant was negative.
    #[error("dividend rule {field} must be non-negative, got {value}")]
    InvalidRule { field: &'static str, value: Decimal },
}

/// Payroll base used by the main-rule allowance and its wage floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayrollBase {
    /// The owner's own gross salary for the year being calculated.
    OwnerSalary,
    /// A fixed total of cash salaries paid by the company per year, SEK.
    Fixed(Decimal),
}

impl PayrollBase {
    /// Resolves the yearly payroll given the owner's gross salary that year.
    pub fn resolve(
        &self,
        owner_gross_salary_yearly: Decimal,
    ) -> Decimal {
        match self {
            Self::OwnerSalary => owner_gross_salary_yearly,
            Self::Fixed(total) => *total,
        }
        .max(Decimal::ZERO)
    }
}

/// Raw settings as entered by the user, before normalization.
///
/// Rates are percentages (`32` means 32 %). Missing fields take the defaults
/// of [`GlobalSettings::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettingsInput {
    #[serde(alias = "kommun")]
    pub municipality: Option<String>,
    #[serde(alias = "kommunalskatt", alias = "kommunskatt")]
    pub municipal_tax: Option<Decimal>,
    #[serde(alias = "landstingsskatt", alias = "regionskatt")]
    pub county_tax: Option<Decimal>,
    pub church_member: Option<bool>,
    #[serde(alias = "kyrkoavgift", alias = "kyrkoskatt")]
    pub church_tax: Option<Decimal>,
    /// Explicit effective salary tax rate; overrides the sum of the parts.
    pub total_tax_rate: Option<Decimal>,
    #[serde(alias = "marginalskatt")]
    pub marginal_tax_rate: Option<Decimal>,
    #[serde(alias = "arbetsgivaravgift")]
    pub employer_contribution: Option<Decimal>,
    pub regional_support: Option<bool>,
    pub ibb: Option<Decimal>,
    #[serde(alias = "bolagsskatt")]
    pub corporate_tax: Option<Decimal>,
    pub share_acquisition_value: Option<Decimal>,
    pub opening_free_equity: Option<Decimal>,
    pub number_of_years: Option<u32>,
    pub total_cash_salaries_yearly: Option<Decimal>,
    /// Income year whose K10 constants to apply; defaults to 2025.
    pub rules_year: Option<i32>,
}

/// Normalized settings for one planning session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    pub municipality: Option<String>,
    pub municipal_tax: Decimal,
    pub county_tax: Decimal,
    pub church_member: bool,
    pub church_tax: Decimal,
    /// Effective personal tax rate on salary, percent.
    pub total_tax_rate: Decimal,
    pub marginal_tax_rate: Decimal,
    pub employer_contribution: Decimal,
    pub regional_support: bool,
    pub ibb: Decimal,
    pub corporate_tax: Decimal,
    pub share_acquisition_value: Decimal,
    pub opening_free_equity: Decimal,
    pub number_of_years: u32,
    pub payroll_base: PayrollBase,
    pub rules: DividendRules,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        let municipal_tax = Decimal::from(32);
        Self {
            municipality: None,
            municipal_tax,
            county_tax: Decimal::ZERO,
            church_member: false,
            church_tax: Decimal::ONE,
            total_tax_rate: municipal_tax,
            marginal_tax_rate: Decimal::from(50),
            employer_contribution: Decimal::new(3142, 2),
            regional_support: false,
            ibb: Decimal::from(80_600),
            corporate_tax: Decimal::new(206, 1),
            share_acquisition_value: Decimal::from(25_000),
            opening_free_equity: Decimal::ZERO,
            number_of_years: 3,
            payroll_base: PayrollBase::OwnerSalary,
            rules: DividendRules::default(),
        }
    }
}

impl GlobalSettings {
    /// Sum of the local tax components, with church fee for members only.
    pub fn tax_rate_from_parts(&self) -> Decimal {
        let church = if self.church_member {
            self.church_tax
        } else {
            Decimal::ZERO
        };
        self.municipal_tax + self.county_tax + church
    }
}

fn rate(
    field: &'static str,
    value: Option<Decimal>,
    default: Decimal,
) -> Result<Decimal, SettingsError> {
    let value = value.unwrap_or(default);
    if value < Decimal::ZERO {
        return Err(SettingsError::NegativeRate { field, value });
    }
    Ok(value)
}

fn amount(
    field: &'static str,
    value: Option<Decimal>,
    default: Decimal,
) -> Result<Decimal, SettingsError> {
    let value = value.unwrap_or(default);
    if value < Decimal::ZERO {
        return Err(SettingsError::NegativeAmount { field, value });
    }
    Ok(value)
}

impl TryFrom<GlobalSettingsInput> for GlobalSettings {
    type Error = SettingsError;

    fn try_from(input: GlobalSettingsInput) -> Result<Self, Self::Error> {
        let defaults = GlobalSettings::default();

        let number_of_years = input.number_of_years.unwrap_or(defaults.number_of_years);
        if !(1..=MAX_PLANNING_YEARS).contains(&number_of_years) {
            return Err(SettingsError::InvalidNumberOfYears(number_of_years));
        }

        let rules = match input.rules_year {
            Some(year) => DividendRules::for_year(year).ok_or(SettingsError::UnknownRulesYear(year))?,
            None => defaults.rules,
        };
        rules.validate()?;

        // K10 rules for a year scale with the previous year's base amount.
        let ibb = match (input.ibb, input.rules_year) {
            (Some(ibb), _) => ibb,
            (None, Some(year)) => income_base_amount(year - 1)
                .ok_or(SettingsError::UnknownIncomeBaseAmount(year - 1))?,
            (None, None) => defaults.ibb,
        };
        if ibb <= Decimal::ZERO {
            return Err(SettingsError::InvalidIncomeBaseAmount(ibb));
        }

        let payroll_base = match input.total_cash_salaries_yearly {
            Some(total) => PayrollBase::Fixed(amount("total_cash_salaries_yearly", Some(total), total)?),
            None => PayrollBase::OwnerSalary,
        };

        let mut settings = GlobalSettings {
            municipality: input.municipality.map(|name| name.trim().to_uppercase()),
            municipal_tax: rate("municipal_tax", input.municipal_tax, defaults.municipal_tax)?,
            county_tax: rate("county_tax", input.county_tax, defaults.county_tax)?,
            church_member: input.church_member.unwrap_or(defaults.church_member),
            church_tax: rate("church_tax", input.church_tax, defaults.church_tax)?,
            total_tax_rate: Decimal::ZERO,
            marginal_tax_rate: rate(
                "marginal_tax_rate",
                input.marginal_tax_rate,
                defaults.marginal_tax_rate,
            )?,
            employer_contribution: rate(
                "employer_contribution",
                input.employer_contribution,
                defaults.employer_contribution,
            )?,
            regional_support: input.regional_support.unwrap_or(defaults.regional_support),
            ibb,
            corporate_tax: rate("corporate_tax", input.corporate_tax, defaults.corporate_tax)?,
            share_acquisition_value: amount(
                "share_acquisition_value",
                input.share_acquisition_value,
                defaults.share_acquisition_value,
            )?,
            opening_free_equity: amount(
                "opening_free_equity",
                input.opening_free_equity,
                defaults.opening_free_equity,
            )?,
            number_of_years,
            payroll_base,
            rules,
        };

        settings.total_tax_rate = match input.total_tax_rate {
            Some(total) => rate("total_tax_rate", Some(total), total)?,
            None => settings.tax_rate_from_parts(),
        };

        Ok(settings)
    }
}
