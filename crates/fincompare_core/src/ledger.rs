//! Capital gain ledger with loss carryforward
//!
//! Each call to [`step`] applies one year of growth to an asset: gains are
//! taxed at the asset's rate, losses are recorded and later offset against
//! the tax due on gains for up to [`LOSS_PRESCRIPTION_YEARS`] years. The
//! previous [`YearState`] is never modified; a new one is derived from the
//! returned [`InvestmentPerformance`].

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::taxes::{AssetType, TaxContext, rate_for};

/// Years a realized loss stays eligible for offsetting
pub const LOSS_PRESCRIPTION_YEARS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalLoss {
    /// Amount still available for offsetting (never negative)
    #[serde(serialize_with = "crate::rounding::cents")]
    pub amount: f64,
    /// Year the loss was realized
    pub year: u32,
}

impl CapitalLoss {
    /// Whether the loss may still offset taxes due in `current_year`
    #[inline]
    pub fn is_eligible(&self, current_year: u32) -> bool {
        self.amount > 0.0 && self.year + LOSS_PRESCRIPTION_YEARS >= current_year
    }
}

/// Running state of one asset, carried from one year to the next
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearState {
    /// Amount added this year; it does not grow until the next year
    pub new_deposit: f64,
    /// Net value at the end of the previous year
    pub net_capital: f64,
    pub cumulative_gain: f64,
    pub cumulative_cost: f64,
    /// In insertion order, oldest first
    pub capital_losses: Vec<CapitalLoss>,
}

impl YearState {
    /// State before the first year, holding only an opening deposit
    pub fn opening(deposit: f64) -> Self {
        Self {
            new_deposit: deposit,
            ..Default::default()
        }
    }

    /// State for the following year, receiving `new_deposit`
    pub fn next(performance: &InvestmentPerformance, new_deposit: f64) -> Self {
        Self {
            new_deposit,
            net_capital: performance.net_value,
            cumulative_gain: performance.gain,
            cumulative_cost: performance.cost,
            capital_losses: performance.capital_losses.clone(),
        }
    }

    fn check(&self) -> Result<()> {
        let fields = [
            ("net_capital", self.net_capital),
            ("cumulative_gain", self.cumulative_gain),
            ("cumulative_cost", self.cumulative_cost),
            ("new_deposit", self.new_deposit),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::InvalidState { field });
            }
        }
        Ok(())
    }
}

/// Outcome of one ledger year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPerformance {
    #[serde(serialize_with = "crate::rounding::cents")]
    pub gross_value: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub net_value: f64,
    /// Cumulative gain net of taxes
    #[serde(serialize_with = "crate::rounding::cents")]
    pub gain: f64,
    /// Cumulative taxes paid
    #[serde(serialize_with = "crate::rounding::cents")]
    pub cost: f64,
    /// Taxes paid this year
    #[serde(serialize_with = "crate::rounding::cents")]
    pub taxes: f64,
    pub capital_losses: Vec<CapitalLoss>,
}

/// Parameters of a single ledger year
#[derive(Debug, Clone, Copy)]
pub struct StepParams<'a> {
    /// Growth of the year in percent (may be negative)
    pub growth_rate: f64,
    pub asset_type: AssetType,
    /// One-based simulation year
    pub year: u32,
    pub tax: TaxContext<'a>,
}

/// Apply one year of growth and taxation to `last`
pub fn step(last: &YearState, params: &StepParams<'_>) -> Result<InvestmentPerformance> {
    last.check()?;

    let gross_gain = last.net_capital * params.growth_rate / 100.0;
    let mut capital_losses = last.capital_losses.clone();

    let taxes = if gross_gain < 0.0 {
        capital_losses.push(CapitalLoss {
            amount: -gross_gain,
            year: params.year,
        });
        0.0
    } else {
        let rate = rate_for(params.asset_type, &params.tax)?;
        offset_losses(gross_gain * rate / 100.0, &mut capital_losses, params.year)
    };

    let gross_value = last.net_capital + last.new_deposit + gross_gain;
    Ok(InvestmentPerformance {
        gross_value,
        net_value: gross_value - taxes,
        gain: last.cumulative_gain + gross_gain - taxes,
        cost: last.cumulative_cost + taxes,
        taxes,
        capital_losses,
    })
}

/// Reduce `taxes` with eligible losses, oldest entry first.
///
/// A loss that covers the remaining taxes keeps the unused part; any other
/// eligible loss is consumed entirely. Returns the taxes still due.
fn offset_losses(mut taxes: f64, losses: &mut [CapitalLoss], current_year: u32) -> f64 {
    for loss in losses.iter_mut() {
        if !loss.is_eligible(current_year) {
            continue;
        }
        taxes -= loss.amount;
        if taxes < 0.0 {
            loss.amount = -taxes;
            return 0.0;
        }
        loss.amount = 0.0;
    }
    taxes
}

/// Run the ledger over a sequence of yearly growth rates and deposits.
///
/// `deposits[i]` is added during year `i + 1`; the first deposit only starts
/// growing in year 2.
pub fn project(
    rates: &[f64],
    deposits: &[f64],
    asset_type: AssetType,
    tax: TaxContext<'_>,
) -> Result<Vec<InvestmentPerformance>> {
    let mut state = YearState::opening(deposits.first().copied().unwrap_or(0.0));
    let mut performance = Vec::with_capacity(rates.len());

    for (index, rate) in rates.iter().enumerate() {
        let params = StepParams {
            growth_rate: *rate,
            asset_type,
            year: index as u32 + 1,
            tax,
        };
        let year = step(&state, &params)?;
        state = YearState::next(&year, deposits.get(index + 1).copied().unwrap_or(0.0));
        performance.push(year);
    }

    Ok(performance)
}
