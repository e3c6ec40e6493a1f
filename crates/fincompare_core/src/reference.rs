//! Reference lookup tables
//!
//! Pension fund historical returns and collective agreement (CCNL)
//! contribution defaults. Tables are handed to the engine already parsed;
//! this module only answers lookups.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// One investment line of a pension fund
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundCompartment {
    /// Annualised return over the last 10 years, percent
    pub return_10y: f64,
    /// Share of equities, percent
    #[serde(default)]
    pub equity_ratio: f64,
    /// Synthetic cost indicator (ISC), percent per year
    #[serde(default)]
    pub annual_cost: f64,
}

/// Fund name -> compartment name -> historical data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FundReturnTable(pub FxHashMap<String, FxHashMap<String, FundCompartment>>);

impl FundReturnTable {
    pub fn compartment(&self, fund: &str, compartment: &str) -> Result<&FundCompartment> {
        self.0
            .get(fund)
            .and_then(|compartments| compartments.get(compartment))
            .ok_or_else(|| ConfigError::UnknownReference {
                table: "fund returns",
                key: format!("{fund}/{compartment}"),
            })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Contribution rules set by a collective agreement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CcnlContribution {
    /// Minimum employee contribution to unlock the employer match, percent of salary
    pub min_employee_pct: f64,
    pub employer_pct: f64,
    /// Negotiated pension fund of the sector
    #[serde(default)]
    pub fund: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CcnlTable(pub FxHashMap<String, CcnlContribution>);

impl CcnlTable {
    pub fn get(&self, ccnl: &str) -> Result<&CcnlContribution> {
        self.0.get(ccnl).ok_or_else(|| ConfigError::UnknownReference {
            table: "ccnl",
            key: ccnl.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// All lookup tables known to the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceData {
    pub funds: FundReturnTable,
    pub ccnl: CcnlTable,
}

#[cfg(test)]
pub(crate) fn sample_reference() -> ReferenceData {
    let mut compartments = FxHashMap::default();
    compartments.insert(
        "balanced".to_string(),
        FundCompartment {
            return_10y: 3.4,
            equity_ratio: 40.0,
            annual_cost: 0.3,
        },
    );
    compartments.insert(
        "growth".to_string(),
        FundCompartment {
            return_10y: 5.1,
            equity_ratio: 70.0,
            annual_cost: 0.4,
        },
    );
    let mut funds = FxHashMap::default();
    funds.insert("Cometa".to_string(), compartments);

    let mut ccnl = FxHashMap::default();
    ccnl.insert(
        "metalmeccanici".to_string(),
        CcnlContribution {
            min_employee_pct: 1.2,
            employer_pct: 2.2,
            fund: Some("Cometa".to_string()),
        },
    );

    ReferenceData {
        funds: FundReturnTable(funds),
        ccnl: CcnlTable(ccnl),
    }
}
