//! Scenario run orchestration shared by the binary and its tests

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use fincompare_core::{monte_carlo_simulate, simulate};

use crate::report::{render_json, render_monte_carlo_table, render_table};
use crate::scenario::{load_reference, load_scenario, prepare};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub seed: u64,
    /// Batch size; a single projection when unset
    pub iterations: Option<usize>,
    pub format: OutputFormat,
    pub reference: Option<PathBuf>,
}

/// Load, prepare and run a scenario file, returning the rendered report
pub fn run(scenario_path: &Path, options: &RunOptions, current_year: i16) -> Result<String> {
    let reference = options
        .reference
        .as_deref()
        .map(load_reference)
        .transpose()?;
    let scenario = prepare(
        load_scenario(scenario_path)?,
        reference.as_ref(),
        current_year,
    )?;
    tracing::info!(
        scenario = %scenario_path.display(),
        years = scenario.years(),
        seed = options.seed,
        iterations = ?options.iterations,
        "running scenario"
    );

    match options.iterations {
        Some(iterations) => {
            let summary = monte_carlo_simulate(&scenario, iterations, options.seed)
                .wrap_err("batch simulation failed")?;
            tracing::info!(mean = summary.mean, p50 = summary.p50, "batch finished");
            match options.format {
                OutputFormat::Json => render_json(&summary),
                OutputFormat::Table => Ok(render_monte_carlo_table(&summary)),
            }
        }
        None => {
            let result = simulate(&scenario, options.seed).wrap_err("projection failed")?;
            tracing::info!(headline = result.headline(), "projection finished");
            match options.format {
                OutputFormat::Json => render_json(&result),
                OutputFormat::Table => Ok(render_table(&result)),
            }
        }
    }
}
