//! Summary return metrics
//!
//! All rates are returned as fractions (0.05 = 5%).

use crate::error::{ConfigError, Result};

/// Compound annual growth rate from `initial` to `final_value` over `years`.
///
/// `Ok(None)` when the final value is not positive (the rate is undefined).
pub fn cagr(initial: f64, final_value: f64, years: u32) -> Result<Option<f64>> {
    check(initial, years)?;
    if final_value <= 0.0 {
        return Ok(None);
    }
    Ok(Some(
        (final_value / initial).powf(1.0 / f64::from(years)) - 1.0,
    ))
}

/// Linear annual return: total return divided by the number of years
pub fn apr(initial: f64, final_value: f64, years: u32) -> Result<f64> {
    check(initial, years)?;
    Ok((final_value - initial) / initial / f64::from(years))
}

/// Return on the total equity invested (own, employer and additional contributions)
pub fn roe(final_value: f64, equity_invested: f64) -> Result<f64> {
    if equity_invested <= 0.0 {
        return Err(ConfigError::non_positive("equity invested", equity_invested));
    }
    Ok((final_value - equity_invested) / equity_invested)
}

fn check(initial: f64, years: u32) -> Result<()> {
    if initial <= 0.0 {
        return Err(ConfigError::non_positive("initial value", initial));
    }
    if years == 0 {
        return Err(ConfigError::non_positive("years", 0.0));
    }
    Ok(())
}
