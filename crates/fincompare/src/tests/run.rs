//! Scenario file to report
//!
//! These tests verify:
//! - A housing file renders a table and JSON with calendar years from the current year
//! - The same seed reproduces the same report
//! - Batches report their distribution in both formats
//! - Reference tables are required by scenarios that name them
//! - Configuration errors surface with file context

use std::fs;
use std::path::PathBuf;

use tempfile::{TempDir, tempdir};

use crate::app::{OutputFormat, RunOptions, run};
use crate::util::io::atomic_write;

const HOUSING: &str = "\
kind: housing
years: 10
house_revaluation:
  mean: 1.5
  variation:
    type: uniform
    range: 2.0
rent:
  monthly_rent: 950
";

const PENSION: &str = "\
kind: pension
years: 15
gross_salary: 35000
ccnl: metalmeccanici
fund:
  compartment: bilanciato
";

const REFERENCE: &str = "\
funds:
  Cometa:
    bilanciato:
      return_10y: 3.4
      equity_ratio: 40
      annual_cost: 0.3
ccnl:
  metalmeccanici:
    min_employee_pct: 1.2
    employer_pct: 2.2
    fund: Cometa
";

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn json_options() -> RunOptions {
    RunOptions {
        seed: 42,
        format: OutputFormat::Json,
        ..Default::default()
    }
}

#[test]
fn test_housing_table_and_json() {
    let dir = tempdir().unwrap();
    let path = write(&dir, "house.yaml", HOUSING);

    let table = run(&path, &RunOptions::default(), 2026).unwrap();
    assert!(table.contains("  1 2026"));
    assert!(table.contains(" 10 2035"));

    let json = run(&path, &json_options(), 2026).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["kind"], "housing");
    let years = value["years"].as_array().unwrap();
    assert_eq!(years.len(), 10);
    assert_eq!(years[0]["calendar_year"], 2026);
    assert_eq!(years[9]["calendar_year"], 2035);
}

#[test]
fn test_explicit_start_year_wins() {
    let dir = tempdir().unwrap();
    let path = write(&dir, "house.yaml", &format!("{HOUSING}start_year: 2030\n"));

    let json = run(&path, &json_options(), 2026).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["years"][0]["calendar_year"], 2030);
}

#[test]
fn test_same_seed_same_report() {
    let dir = tempdir().unwrap();
    let path = write(&dir, "house.yaml", HOUSING);

    let first = run(&path, &json_options(), 2026).unwrap();
    let second = run(&path, &json_options(), 2026).unwrap();
    assert_eq!(first, second);

    let other_seed = RunOptions {
        seed: 7,
        ..json_options()
    };
    assert_ne!(first, run(&path, &other_seed, 2026).unwrap());
}

#[test]
fn test_batch_reports() {
    let dir = tempdir().unwrap();
    let path = write(&dir, "house.yaml", HOUSING);
    let options = RunOptions {
        iterations: Some(50),
        ..json_options()
    };

    let json = run(&path, &options, 2026).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["iterations"], 50);
    assert_eq!(value["seed"], 42);
    let p5 = value["p5"].as_f64().unwrap();
    let p95 = value["p95"].as_f64().unwrap();
    assert!(p5 <= p95);

    let table = run(
        &path,
        &RunOptions {
            format: OutputFormat::Table,
            ..options
        },
        2026,
    )
    .unwrap();
    assert!(table.starts_with("Iterations"));
}

#[test]
fn test_pension_with_reference() {
    let dir = tempdir().unwrap();
    let path = write(&dir, "pension.yaml", PENSION);
    let reference = write(&dir, "reference.yaml", REFERENCE);

    let options = RunOptions {
        reference: Some(reference),
        ..json_options()
    };
    let json = run(&path, &options, 2026).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["kind"], "pension");
    assert_eq!(value["years"].as_array().unwrap().len(), 15);
    assert_eq!(value["summary"]["paths"].as_array().unwrap().len(), 3);
}

#[test]
fn test_unresolved_reference_is_an_error() {
    let dir = tempdir().unwrap();
    let path = write(&dir, "pension.yaml", PENSION);
    let reference = write(&dir, "reference.yaml", "ccnl: {}\n");

    let options = RunOptions {
        reference: Some(reference),
        ..json_options()
    };
    let err = run(&path, &options, 2026).unwrap_err();
    assert!(format!("{err:#}").contains("reference"));
}

#[test]
fn test_invalid_scenario_names_the_problem() {
    let dir = tempdir().unwrap();
    let path = write(
        &dir,
        "house.yaml",
        "kind: housing\nmortgage:\n  term_years: 12\n",
    );

    let err = run(&path, &RunOptions::default(), 2026).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("invalid scenario configuration"));
    assert!(message.contains("12"));
}

#[test]
fn test_report_written_atomically() {
    let dir = tempdir().unwrap();
    let path = write(&dir, "house.yaml", HOUSING);
    let output = dir.path().join("report.json");

    let report = run(&path, &json_options(), 2026).unwrap();
    atomic_write(&output, &report).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), report);
    assert!(!dir.path().join("report.json.tmp").exists());
}
