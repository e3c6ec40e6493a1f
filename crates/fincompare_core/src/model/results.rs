//! Scenario results and batch statistics

use serde::{Deserialize, Serialize};

use super::housing::HousingProjection;
use super::pension::PensionProjection;

/// Complete output of one scenario run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioResult {
    Housing(HousingProjection),
    Pension(PensionProjection),
}

impl ScenarioResult {
    /// Final metric compared across runs: purchase minus rent net position,
    /// or the net worth of the best pension path
    pub fn headline(&self) -> f64 {
        match self {
            ScenarioResult::Housing(projection) => projection.summary.net_worth_difference,
            ScenarioResult::Pension(projection) => projection.summary.best_net_worth(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ScenarioResult::Housing(projection) => projection.years.len(),
            ScenarioResult::Pension(projection) => projection.years.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Distribution of the headline metric over a batch of seeded runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloSummary {
    pub iterations: usize,
    pub seed: u64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub mean: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub p5: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub p50: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub p95: f64,
    /// Share of runs with a positive headline
    pub positive_ratio: f64,
}

impl MonteCarloSummary {
    /// Summarise headline values; `values` is sorted in place
    pub fn from_values(values: &mut [f64], seed: u64) -> Self {
        values.sort_by(f64::total_cmp);
        let n = values.len();
        let mean = if n == 0 {
            0.0
        } else {
            values.iter().sum::<f64>() / n as f64
        };
        let positive = values.iter().filter(|v| **v > 0.0).count();
        Self {
            iterations: n,
            seed,
            mean,
            p5: percentile(values, 0.05),
            p50: percentile(values, 0.50),
            p95: percentile(values, 0.95),
            positive_ratio: if n == 0 { 0.0 } else { positive as f64 / n as f64 },
        }
    }
}

/// Nearest-rank percentile of sorted values
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64 * p).round() as usize).min(sorted.len() - 1);
    sorted[idx]
}
