//! Configuration errors raised by the projection engine
//!
//! Every variant is fatal for the scenario being computed: a run either
//! returns a complete yearly sequence or one of these errors. Financial
//! edge cases (negative gains, zero mortgage, early payoff) are never errors.

use crate::taxes::AssetType;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A tax computation needs context that was not supplied
    #[error("{field} is required to compute the tax rate for {asset:?}")]
    MissingContext {
        field: &'static str,
        asset: AssetType,
    },

    #[error("unknown asset type: {0:?}")]
    UnknownAssetType(String),

    /// Zero or negative value used as a divisor or a count
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("unsupported mortgage term of {0} years (expected 10, 15, 20, 25 or 30)")]
    UnsupportedMortgageTerm(u32),

    #[error("simulation length of {0} years is outside 2..=100")]
    YearsOutOfRange(u32),

    /// A carried year state has a non-finite mandatory field
    #[error("year state field {field} is not a finite number")]
    InvalidState { field: &'static str },

    #[error("invalid {kind} variation (mean={mean}, spread={spread}): {reason}")]
    InvalidDistribution {
        kind: &'static str,
        mean: f64,
        spread: f64,
        reason: &'static str,
    },

    #[error("{table} has no entry for {key:?}")]
    UnknownReference { table: &'static str, key: String },
}

impl ConfigError {
    pub(crate) fn non_positive(field: &'static str, value: f64) -> Self {
        ConfigError::NonPositive { field, value }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
