//! Scenario configuration
//!
//! A scenario is a complete, self-consistent snapshot of inputs. Every field
//! has a default so partial YAML/JSON files are accepted; `validate` runs
//! the guards the projection relies on (simulation length, mortgage terms,
//! divisors) before any year is computed.

mod housing;
mod pension;

pub use housing::{HousingConfig, InvestmentConfig, MortgageConfig, PurchaseCosts, RentConfig};
pub use pension::{DEDUCTION_CAP, DEFAULT_TFR_RATE, FundSelection, PensionConfig};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::reference::ReferenceData;

/// Supported simulation lengths
pub const YEARS_RANGE: std::ops::RangeInclusive<u32> = 2..=100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioConfig {
    Housing(HousingConfig),
    Pension(PensionConfig),
}

impl ScenarioConfig {
    pub fn validate(&self) -> Result<()> {
        match self {
            ScenarioConfig::Housing(config) => config.validate(),
            ScenarioConfig::Pension(config) => config.validate(),
        }
    }

    pub fn years(&self) -> u32 {
        match self {
            ScenarioConfig::Housing(config) => config.years,
            ScenarioConfig::Pension(config) => config.years,
        }
    }

    pub fn start_year(&self) -> Option<i16> {
        match self {
            ScenarioConfig::Housing(config) => config.start_year,
            ScenarioConfig::Pension(config) => config.start_year,
        }
    }

    /// Set the first calendar year unless the scenario already names one
    pub fn with_default_start_year(mut self, year: i16) -> Self {
        let start_year = match &mut self {
            ScenarioConfig::Housing(config) => &mut config.start_year,
            ScenarioConfig::Pension(config) => &mut config.start_year,
        };
        start_year.get_or_insert(year);
        self
    }

    /// Resolve reference lookups; housing scenarios use none
    pub fn apply_reference(&mut self, reference: &ReferenceData) -> Result<()> {
        match self {
            ScenarioConfig::Housing(_) => Ok(()),
            ScenarioConfig::Pension(config) => config.apply_reference(reference),
        }
    }
}

fn check_years(years: u32) -> Result<()> {
    if YEARS_RANGE.contains(&years) {
        Ok(())
    } else {
        Err(ConfigError::YearsOutOfRange(years))
    }
}

/// Calendar label of a one-based simulation year
pub fn calendar_year(start_year: Option<i16>, year: u32) -> Option<i16> {
    let offset = i16::try_from(year).ok()?.checked_sub(1)?;
    start_year?.checked_add(offset)
}
