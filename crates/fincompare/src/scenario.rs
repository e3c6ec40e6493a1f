//! Scenario and reference file loading

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use fincompare_core::{ReferenceData, ScenarioConfig};

pub fn parse_scenario(yaml: &str) -> Result<ScenarioConfig> {
    Ok(serde_saphyr::from_str(yaml)?)
}

pub fn load_scenario(path: &Path) -> Result<ScenarioConfig> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read scenario {}", path.display()))?;
    parse_scenario(&content).wrap_err_with(|| format!("invalid scenario {}", path.display()))
}

pub fn load_reference(path: &Path) -> Result<ReferenceData> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read reference data {}", path.display()))?;
    let reference: ReferenceData = serde_saphyr::from_str(&content)
        .wrap_err_with(|| format!("invalid reference data {}", path.display()))?;
    tracing::debug!(
        funds = reference.funds.len(),
        ccnl = reference.ccnl.len(),
        "reference data loaded"
    );
    Ok(reference)
}

/// Complete a loaded scenario: label years from `current_year` unless the
/// file sets `start_year`, resolve reference lookups, and check the result.
pub fn prepare(
    scenario: ScenarioConfig,
    reference: Option<&ReferenceData>,
    current_year: i16,
) -> Result<ScenarioConfig> {
    let mut scenario = scenario.with_default_start_year(current_year);
    if let Some(reference) = reference {
        scenario
            .apply_reference(reference)
            .wrap_err("failed to apply reference data")?;
    }
    scenario.validate().wrap_err("invalid scenario configuration")?;
    Ok(scenario)
}
