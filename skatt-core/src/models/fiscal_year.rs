//! Fiscal-year constants for close-company ("3:12") dividend planning.
//!
//! The amounts and percentages below are the ones published for blankett K10
//! and the yearly income base amount (inkomstbasbelopp).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::SettingsError;

/// Income base amount (IBB) per year, SEK.
const INCOME_BASE_AMOUNTS: [(i32, i64); 7] = [
    (2025, 81_700),
    (2024, 80_600),
    (2023, 76_100),
    (2022, 71_800),
    (2021, 68_200),
    (2020, 66_800),
    (2019, 64_400),
];

/// K10 main-rule interest and carry-forward uplift, both in hundredths of a
/// percent: (year, interest, uplift).
const K10_RATES: [(i32, i64, i64); 6] = [
    (2025, 1096, 10496),
    (2024, 1162, 10562),
    (2023, 1094, 10494),
    (2022, 923, 10323),
    (2021, 900, 10300),
    (2020, 900, 10300),
];

/// Returns the published income base amount for `year`, if known.
pub fn income_base_amount(year: i32) -> Option<Decimal> {
    INCOME_BASE_AMOUNTS
        .iter()
        .find(|(y, _)| *y == year)
        .map(|(_, amount)| Decimal::from(*amount))
}

/// Constants of the dividend-allowance (gränsbelopp) rules.
///
/// Multipliers are plain factors; fields suffixed `_rate` are percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividendRules {
    /// Simplified-rule allowance as a multiple of IBB (2.75).
    pub simplified_rule_ibb_multiplier: Decimal,
    /// Share of the payroll base counted in the main-rule allowance (0.5).
    pub main_rule_salary_share: Decimal,
    /// Interest on the share acquisition value in the main rule, percent.
    pub main_rule_interest_rate: Decimal,
    /// Wage floor: IBB multiple added to the payroll share (6).
    pub wage_floor_ibb_multiplier: Decimal,
    /// Wage floor: share of the payroll base (0.05).
    pub wage_floor_salary_share: Decimal,
    /// Wage floor: lower bound as an IBB multiple (9.6).
    pub wage_floor_minimum_ibb_multiplier: Decimal,
    /// Yearly uplift on unused allowance carried forward, percent (104.96).
    pub carry_forward_uplift_rate: Decimal,
    /// Flat tax on dividends within the allowance, percent (20).
    pub low_dividend_tax_rate: Decimal,
}

impl Default for DividendRules {
    fn default() -> Self {
        Self {
            simplified_rule_ibb_multiplier: Decimal::new(275, 2),
            main_rule_salary_share: Decimal::new(5, 1),
            main_rule_interest_rate: Decimal::new(1096, 2),
            wage_floor_ibb_multiplier: Decimal::from(6),
            wage_floor_salary_share: Decimal::new(5, 2),
            wage_floor_minimum_ibb_multiplier: Decimal::new(96, 1),
            carry_forward_uplift_rate: Decimal::new(10496, 2),
            low_dividend_tax_rate: Decimal::from(20),
        }
    }
}

impl DividendRules {
    /// Rules for a given income year, using that year's K10 interest and
    /// uplift. Returns `None` for years without published figures.
    pub fn for_year(year: i32) -> Option<Self> {
        K10_RATES
            .iter()
            .find(|(y, _, _)| *y == year)
            .map(|(_, interest, uplift)| Self {
                main_rule_interest_rate: Decimal::new(*interest, 2),
                carry_forward_uplift_rate: Decimal::new(*uplift, 2),
                ..Self::default()
            })
    }

    /// Factor applied to saved allowance when it is carried into the next year.
    pub fn carry_forward_factor(&self) -> Decimal {
        self.carry_forward_uplift_rate / Decimal::ONE_HUNDRED
    }

    /// Rejects negative constants.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidRule`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let fields = [
            (
                "simplified_rule_ibb_multiplier",
                self.simplified_rule_ibb_multiplier,
            ),
            ("main_rule_salary_share", self.main_rule_salary_share),
            ("main_rule_interest_rate", self.main_rule_interest_rate),
            ("wage_floor_ibb_multiplier", self.wage_floor_ibb_multiplier),
            ("wage_floor_salary_share", self.wage_floor_salary_share),
            (
                "wage_floor_minimum_ibb_multiplier",
                self.wage_floor_minimum_ibb_multiplier,
            ),
            ("carry_forward_uplift_rate", self.carry_forward_uplift_rate),
            ("low_dividend_tax_rate", self.low_dividend_tax_rate),
        ];

        match fields.into_iter().find(|(_, value)| *value < Decimal::ZERO) {
            Some((field, value)) => Err(SettingsError::InvalidRule { field, value }),
            None => Ok(()),
        }
    }
}
