//! Scenario orchestration
//!
//! A run validates the configuration, draws every yearly rate up front from
//! the supplied random source, then hands the rate sequences to the
//! projector of the scenario kind. Fixed-rate scenarios never touch the
//! random source, so their output does not depend on the seed.

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::ScenarioConfig;
use crate::error::Result;
use crate::housing::{self, HousingRates};
use crate::model::{MonteCarloSummary, ScenarioResult};
use crate::pension::{self, PensionRates};

/// Run a scenario with a generator seeded from `seed`
pub fn simulate(config: &ScenarioConfig, seed: u64) -> Result<ScenarioResult> {
    let mut rng = SmallRng::seed_from_u64(seed);
    simulate_with_rng(config, &mut rng)
}

/// Run a scenario drawing yearly variations from `rng`
pub fn simulate_with_rng<R: Rng + ?Sized>(
    config: &ScenarioConfig,
    rng: &mut R,
) -> Result<ScenarioResult> {
    config.validate()?;
    tracing::debug!(years = config.years(), "scenario started");

    let result = match config {
        ScenarioConfig::Housing(housing) => {
            let rates = HousingRates::sample(housing, rng)?;
            ScenarioResult::Housing(housing::project(housing, &rates)?)
        }
        ScenarioConfig::Pension(pension) => {
            let rates = PensionRates::sample(pension, rng)?;
            ScenarioResult::Pension(pension::project(pension, &rates)?)
        }
    };

    tracing::debug!(headline = result.headline(), "scenario finished");
    Ok(result)
}

/// Seeds of the individual runs of a batch
fn iteration_seeds(seed: u64, iterations: usize) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..iterations).map(|_| rng.next_u64()).collect()
}

/// Run `iterations` seeded scenarios and summarise the headline metric.
///
/// Each run gets its own seed derived from `seed`, so the summary is the
/// same whatever the number of threads.
pub fn monte_carlo_simulate(
    config: &ScenarioConfig,
    iterations: usize,
    seed: u64,
) -> Result<MonteCarloSummary> {
    config.validate()?;
    let seeds = iteration_seeds(seed, iterations);

    #[cfg(feature = "parallel")]
    let headlines: Result<Vec<f64>> = seeds
        .into_par_iter()
        .map(|s| simulate(config, s).map(|r| r.headline()))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let headlines: Result<Vec<f64>> = seeds
        .into_iter()
        .map(|s| simulate(config, s).map(|r| r.headline()))
        .collect();

    let mut headlines = headlines?;
    let summary = MonteCarloSummary::from_values(&mut headlines, seed);
    tracing::debug!(
        iterations,
        p5 = summary.p5,
        p50 = summary.p50,
        p95 = summary.p95,
        "batch finished"
    );
    Ok(summary)
}
