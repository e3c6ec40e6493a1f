//! Severance and pension fund output records

use serde::{Deserialize, Serialize};

use crate::ledger::InvestmentPerformance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PensionPath {
    /// Severance kept by the employer
    Company,
    Fund,
    EnhancedFund,
}

impl PensionPath {
    pub const ALL: [PensionPath; 3] = [
        PensionPath::Company,
        PensionPath::Fund,
        PensionPath::EnhancedFund,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PensionPath::Company => "company",
            PensionPath::Fund => "fund",
            PensionPath::EnhancedFund => "enhanced fund",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionPathYear {
    /// Paid into the path this year (severance plus contributions)
    #[serde(serialize_with = "crate::rounding::cents")]
    pub deposit: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub cumulative_deposits: f64,
    /// Income tax saved by deducting contributions this year
    #[serde(serialize_with = "crate::rounding::cents")]
    pub tax_saving: f64,
    pub performance: InvestmentPerformance,
    /// Percent applied if the position were withdrawn at year end
    pub exit_tax_rate: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub exit_tax: f64,
    /// Side investment funded with the part of the budget this path does not use
    pub opportunity_cost: InvestmentPerformance,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub opportunity_deposits: f64,
    /// Position after exit tax plus the side investment
    #[serde(serialize_with = "crate::rounding::cents")]
    pub net_worth: f64,
}

impl PensionPathYear {
    /// Everything paid in so far, including employer money and the side investment
    pub fn equity_invested(&self) -> f64 {
        self.cumulative_deposits + self.opportunity_deposits
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementYear {
    pub year: u32,
    pub calendar_year: Option<i16>,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub salary: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub tfr: f64,
    pub company: PensionPathYear,
    pub fund: PensionPathYear,
    pub enhanced_fund: PensionPathYear,
}

impl RetirementYear {
    pub fn path(&self, path: PensionPath) -> &PensionPathYear {
        match path {
            PensionPath::Company => &self.company,
            PensionPath::Fund => &self.fund,
            PensionPath::EnhancedFund => &self.enhanced_fund,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSummary {
    pub path: PensionPath,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub net_worth: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub equity_invested: f64,
    /// Fractions; `None` when nothing was paid in or the final value is not positive
    pub roe: Option<f64>,
    pub cagr: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionSummary {
    pub paths: Vec<PathSummary>,
    pub best: PensionPath,
    /// Fund minus company net worth at the end
    #[serde(serialize_with = "crate::rounding::cents")]
    pub net_worth_difference: f64,
}

impl PensionSummary {
    pub fn best_net_worth(&self) -> f64 {
        self.paths
            .iter()
            .find(|p| p.path == self.best)
            .map_or(0.0, |p| p.net_worth)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionProjection {
    pub years: Vec<RetirementYear>,
    pub summary: PensionSummary,
}
