//! Long-horizon personal finance comparison engine
//!
//! This crate projects two competing strategies year by year and reports
//! which one ends ahead. It supports:
//! - Buying a house with or without a mortgage vs renting and investing the difference
//! - Keeping the severance (TFR) with the employer vs a pension fund vs an
//!   enhanced pension fund with voluntary contributions
//! - Italian tax rules: progressive IRPEF brackets, capital gain rates per
//!   asset type with equity/bond blending, loss carryforward with a 4-year window
//! - Fixed or randomly varying yearly rates with a seedable random source
//!
//! ```ignore
//! use fincompare_core::{ScenarioConfig, HousingConfig, simulate};
//!
//! let config = ScenarioConfig::Housing(HousingConfig::default());
//! let result = simulate(&config, 42)?;
//! println!("{}", result.headline());
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod compound;
pub mod error;
pub mod housing;
pub mod ledger;
pub mod market;
pub mod metrics;
pub mod mortgage;
pub mod pension;
pub mod reference;
pub mod rounding;
pub mod simulation;
pub mod taxes;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{HousingConfig, PensionConfig, ScenarioConfig};
pub use error::{ConfigError, Result};
pub use market::{RateSpec, Variation};
pub use model::{MonteCarloSummary, ScenarioResult};
pub use reference::ReferenceData;
pub use simulation::{monte_carlo_simulate, simulate, simulate_with_rng};
pub use taxes::AssetType;
