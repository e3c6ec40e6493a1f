//! Severance destination through the orchestrator
//!
//! These tests verify:
//! - Equal budget: every path parts with the same money each year
//! - Reference data flows into the projection
//! - Long careers favor the pension fund under default assumptions

use crate::config::{PensionConfig, ScenarioConfig};
use crate::error::ConfigError;
use crate::market::RateSpec;
use crate::model::{PensionPath, PensionProjection, ScenarioResult};
use crate::reference::sample_reference;
use crate::simulation::simulate;

fn pension(result: ScenarioResult) -> PensionProjection {
    match result {
        ScenarioResult::Pension(projection) => projection,
        ScenarioResult::Housing(_) => panic!("expected a pension result"),
    }
}

/// Side investment made during the year at `index`
fn yearly_opportunity(projection: &PensionProjection, index: usize, path: PensionPath) -> f64 {
    let current = projection.years[index].path(path).opportunity_deposits;
    let previous = index
        .checked_sub(1)
        .map_or(0.0, |i| projection.years[i].path(path).opportunity_deposits);
    current - previous
}

#[test]
fn test_out_of_pocket_is_equal_across_paths() {
    let config = PensionConfig {
        years: 20,
        salary_growth: RateSpec::uniform(1.5, 1.0),
        ..Default::default()
    };
    let projection = pension(simulate(&ScenarioConfig::Pension(config.clone()), 3).unwrap());

    for (index, item) in projection.years.iter().enumerate() {
        let employee = item.salary * config.employee_contribution_pct / 100.0;
        let additional = item.salary * config.additional_contribution_pct / 100.0;

        // Own contributions - tax saved + side investment
        let company = yearly_opportunity(&projection, index, PensionPath::Company);
        let fund = employee - item.fund.tax_saving
            + yearly_opportunity(&projection, index, PensionPath::Fund);
        let enhanced = employee + additional - item.enhanced_fund.tax_saving
            + yearly_opportunity(&projection, index, PensionPath::EnhancedFund);

        assert!((company - (employee + additional)).abs() < 1e-6, "year {}", item.year);
        assert!((company - fund).abs() < 1e-6, "year {}", item.year);
        assert!((company - enhanced).abs() < 1e-6, "year {}", item.year);
    }
}

#[test]
fn test_reference_data_applied_before_run() {
    let mut scenario = ScenarioConfig::Pension(PensionConfig {
        ccnl: Some("metalmeccanici".to_string()),
        ..Default::default()
    });
    scenario.apply_reference(&sample_reference()).unwrap();
    let ScenarioConfig::Pension(config) = &scenario else {
        panic!("expected a pension scenario");
    };
    assert_eq!(config.employer_contribution_pct, 2.2);

    let projection = pension(simulate(&scenario, 0).unwrap());
    let first = &projection.years[0];
    let expected = first.salary * (6.91 + 1.2 + 2.2) / 100.0;
    assert!((first.fund.deposit - expected).abs() < 1e-9);

    let mut unknown = ScenarioConfig::Pension(PensionConfig {
        ccnl: Some("unknown".to_string()),
        ..Default::default()
    });
    assert!(matches!(
        unknown.apply_reference(&sample_reference()),
        Err(ConfigError::UnknownReference { .. })
    ));
}

#[test]
fn test_long_career_prefers_fund() {
    let config = ScenarioConfig::Pension(PensionConfig {
        years: 35,
        ..Default::default()
    });
    let projection = pension(simulate(&config, 0).unwrap());

    let last = &projection.years[34];
    assert!(last.fund.net_worth > last.company.net_worth);
    assert_ne!(projection.summary.best, PensionPath::Company);
    assert!(projection.summary.net_worth_difference > 0.0);

    // Severance accrual follows the salary
    for item in &projection.years {
        assert!((item.tfr - item.salary * 0.0691).abs() < 1e-9);
    }
}

#[test]
fn test_zero_salary_is_a_configuration_error() {
    let config = ScenarioConfig::Pension(PensionConfig {
        gross_salary: 0.0,
        ..Default::default()
    });
    assert!(matches!(
        simulate(&config, 0),
        Err(ConfigError::NonPositive { .. })
    ));
}
