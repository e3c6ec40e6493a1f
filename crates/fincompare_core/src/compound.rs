//! Compound growth with periodic contributions
//!
//! Simulates a capital that grows at a nominal annual rate split into
//! `frequency` sub-periods, receives contributions before each sub-period
//! compounds, and optionally pays a yearly tax on interest and a flat yearly
//! levy on capital. Used for revaluations (zero contributions), opportunity
//! cost investments and periodic investment plans.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Monthly compounding
pub const DEFAULT_FREQUENCY: u32 = 12;

/// Yearly contribution schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Contribution {
    /// Same amount every year
    Fixed(f64),
    /// One amount per year; missing years contribute nothing
    PerYear(Vec<f64>),
}

impl Default for Contribution {
    fn default() -> Self {
        Contribution::Fixed(0.0)
    }
}

impl Contribution {
    /// Contribution for a zero-based year index
    #[inline]
    pub fn for_year(&self, index: usize) -> f64 {
        match self {
            Contribution::Fixed(amount) => *amount,
            Contribution::PerYear(amounts) => amounts.get(index).copied().unwrap_or(0.0),
        }
    }
}

/// Yearly deductions, both in percent
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnualTax {
    /// Charged on the interest earned during the year
    pub interest_rate: f64,
    /// Charged on the capital at year end (wealth / stamp duty levies)
    pub capital_levy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthParams {
    pub initial_capital: f64,
    /// Nominal annual rate in percent
    pub annual_rate: f64,
    pub years: u32,
    pub contribution: Contribution,
    pub frequency: u32,
    pub annual_tax: Option<AnnualTax>,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            initial_capital: 0.0,
            annual_rate: 0.0,
            years: 1,
            contribution: Contribution::default(),
            frequency: DEFAULT_FREQUENCY,
            annual_tax: None,
        }
    }
}

/// State at the end of one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompoundPerformance {
    /// One-based year
    pub period: u32,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub capital: f64,
    /// Cumulative, including the initial capital
    #[serde(serialize_with = "crate::rounding::cents")]
    pub contributions: f64,
    /// Paid during this period only
    #[serde(serialize_with = "crate::rounding::cents")]
    pub taxes: f64,
}

/// Grow `params.initial_capital` at a constant rate
pub fn grow(params: &GrowthParams) -> Result<Vec<CompoundPerformance>> {
    let rates = vec![params.annual_rate; params.years as usize];
    grow_with_rates(params, &rates)
}

/// Grow with one annual rate (percent) per year; `params.annual_rate` is ignored.
///
/// The number of simulated years is `rates.len()`.
pub fn grow_with_rates(params: &GrowthParams, rates: &[f64]) -> Result<Vec<CompoundPerformance>> {
    if params.frequency == 0 {
        return Err(ConfigError::non_positive("compounding frequency", 0.0));
    }
    let frequency = f64::from(params.frequency);
    let annual_tax = params.annual_tax.unwrap_or_default();

    let mut current_capital = params.initial_capital;
    let mut total_contributions = params.initial_capital;
    let mut performance = Vec::with_capacity(rates.len());

    for (index, rate) in rates.iter().enumerate() {
        let period_rate = rate / 100.0 / frequency;
        let period_contribution = params.contribution.for_year(index) / frequency;
        let mut interest = 0.0;

        for _ in 0..params.frequency {
            current_capital += period_contribution;
            total_contributions += period_contribution;
            let earned = current_capital * period_rate;
            interest += earned;
            current_capital += earned;
        }

        let interest_tax = interest.max(0.0) * annual_tax.interest_rate / 100.0;
        current_capital -= interest_tax;
        let levy = current_capital.max(0.0) * annual_tax.capital_levy / 100.0;
        current_capital -= levy;

        performance.push(CompoundPerformance {
            period: index as u32 + 1,
            capital: current_capital,
            contributions: total_contributions,
            taxes: interest_tax + levy,
        });
    }

    Ok(performance)
}

/// Value of `initial` after each year of `rates` (percent), starting with `initial` itself.
///
/// Returns `rates.len() + 1` values; element `i` is the value at the start of year `i + 1`.
pub fn revaluation_series(initial: f64, rates: &[f64]) -> Result<Vec<f64>> {
    let params = GrowthParams {
        initial_capital: initial,
        frequency: 1,
        ..Default::default()
    };
    let mut series = Vec::with_capacity(rates.len() + 1);
    series.push(initial);
    series.extend(grow_with_rates(&params, rates)?.iter().map(|p| p.capital));
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_lump_sum_monthly_compounding() {
        let params = GrowthParams {
            initial_capital: 10_000.0,
            annual_rate: 6.0,
            years: 10,
            ..Default::default()
        };
        let result = grow(&params).unwrap();

        assert_eq!(result.len(), 10);
        assert_eq!(result[0].period, 1);
        assert_eq!(result[9].period, 10);
        let expected = 10_000.0 * (1.0_f64 + 0.06 / 12.0).powi(120);
        approx(result[9].capital, expected, 1e-6);
        approx(result[9].contributions, 10_000.0, 1e-9);
        assert!(result.iter().all(|p| p.taxes == 0.0));
    }

    #[test]
    fn test_contributions_added_before_compounding() {
        let params = GrowthParams {
            initial_capital: 0.0,
            annual_rate: 12.0,
            years: 1,
            contribution: Contribution::Fixed(1_200.0),
            ..Default::default()
        };
        let result = grow(&params).unwrap();

        // 100 per month, each deposit compounds from the month it is made
        let expected: f64 = (1..=12).map(|k| 100.0 * 1.01_f64.powi(k)).sum();
        approx(result[0].capital, expected, 1e-9);
        approx(result[0].contributions, 1_200.0, 1e-9);
    }

    #[test]
    fn test_per_year_contributions_shorter_than_horizon() {
        let params = GrowthParams {
            annual_rate: 0.0,
            years: 4,
            contribution: Contribution::PerYear(vec![1_000.0, 2_000.0]),
            ..Default::default()
        };
        let result = grow(&params).unwrap();

        let capitals: Vec<f64> = result.iter().map(|p| p.capital).collect();
        assert_eq!(capitals.len(), 4);
        approx(capitals[0], 1_000.0, 1e-9);
        approx(capitals[1], 3_000.0, 1e-9);
        approx(capitals[2], 3_000.0, 1e-9);
        approx(capitals[3], 3_000.0, 1e-9);
    }

    #[test]
    fn test_annual_tax_is_not_carried() {
        let params = GrowthParams {
            initial_capital: 10_000.0,
            annual_rate: 10.0,
            years: 2,
            frequency: 1,
            annual_tax: Some(AnnualTax {
                interest_rate: 26.0,
                capital_levy: 0.2,
            }),
            ..Default::default()
        };
        let result = grow(&params).unwrap();

        // Year 1: 1000 interest, 260 tax, levy on 10740
        let levy_1 = 10_740.0 * 0.002;
        approx(result[0].taxes, 260.0 + levy_1, 1e-9);
        approx(result[0].capital, 10_740.0 - levy_1, 1e-9);

        // Year 2 taxes depend only on year 2 interest and capital
        let start = result[0].capital;
        let interest = start * 0.10;
        let after_interest_tax = start + interest - interest * 0.26;
        let levy_2 = after_interest_tax * 0.002;
        approx(result[1].taxes, interest * 0.26 + levy_2, 1e-9);
        approx(result[1].capital, after_interest_tax - levy_2, 1e-9);
    }

    #[test]
    fn test_negative_year_pays_only_levy() {
        let params = GrowthParams {
            initial_capital: 1_000.0,
            frequency: 1,
            annual_tax: Some(AnnualTax {
                interest_rate: 26.0,
                capital_levy: 0.0,
            }),
            ..Default::default()
        };
        let result = grow_with_rates(&params, &[-10.0]).unwrap();
        approx(result[0].capital, 900.0, 1e-9);
        assert_eq!(result[0].taxes, 0.0);
    }

    #[test]
    fn test_zero_frequency_is_rejected() {
        let params = GrowthParams {
            frequency: 0,
            ..Default::default()
        };
        assert!(matches!(
            grow(&params),
            Err(ConfigError::NonPositive { .. })
        ));
    }

    #[test]
    fn test_revaluation_series() {
        let series = revaluation_series(100.0, &[10.0, 10.0, -50.0]).unwrap();
        assert_eq!(series.len(), 4);
        approx(series[0], 100.0, 1e-12);
        approx(series[1], 110.0, 1e-9);
        approx(series[2], 121.0, 1e-9);
        approx(series[3], 60.5, 1e-9);
    }
}
