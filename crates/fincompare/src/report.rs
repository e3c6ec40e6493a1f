//! Rendering of scenario results as JSON or a plain-text table

use std::fmt::Write;

use color_eyre::eyre::Result;
use fincompare_core::model::{HousingProjection, PensionPath, PensionProjection, RetirementYear};
use fincompare_core::{MonteCarloSummary, ScenarioResult};
use serde::Serialize;

use crate::util::format::{
    format_euro, format_euro_short, format_optional_percentage, format_percentage,
};

pub fn render_json<T: Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

pub fn render_table(result: &ScenarioResult) -> String {
    match result {
        ScenarioResult::Housing(projection) => housing_table(projection),
        ScenarioResult::Pension(projection) => pension_table(projection),
    }
}

fn year_label(year: u32, calendar_year: Option<i16>) -> String {
    match calendar_year {
        Some(calendar) => format!("{year:>3} {calendar}"),
        None => format!("{year:>3}"),
    }
}

fn housing_table(projection: &HousingProjection) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:>14} {:>14} {:>14} {:>16} {:>16}",
        "Year", "House value", "Buy cost", "Rent cost", "Buy position", "Rent position"
    );
    for item in &projection.years {
        let _ = writeln!(
            out,
            "{:<8} {:>14} {:>14} {:>14} {:>16} {:>16}",
            year_label(item.year, item.calendar_year),
            format_euro_short(item.house_value),
            format_euro_short(item.purchase.cumulative_cost),
            format_euro_short(item.rent.cumulative_cost),
            format_euro_short(item.purchase.net_position),
            format_euro_short(item.rent.net_position),
        );
    }

    let summary = &projection.summary;
    let costs = &summary.initial_costs;
    out.push('\n');
    let rows = [
        ("Initial purchase costs", format_euro(costs.purchase_total())),
        ("Monthly mortgage payment", format_euro(summary.monthly_mortgage_payment)),
        ("Total mortgage interest", format_euro(summary.total_interest)),
        ("Total purchase cost", format_euro(summary.total_purchase_cost)),
        ("Total rent cost", format_euro(summary.total_rent_cost)),
        ("Final house value", format_euro(summary.final_house_value)),
        ("House CAGR", format_optional_percentage(summary.house_cagr)),
        ("House APR", format_percentage(summary.house_apr)),
        ("Purchase ROI", format_percentage(summary.purchase_roi)),
        ("Purchase net worth", format_euro(summary.purchase_net_worth)),
        ("Rent net worth", format_euro(summary.rent_net_worth)),
        ("Buy minus rent", format_euro(summary.net_worth_difference)),
        (
            "Break-even year",
            summary
                .break_even_year
                .map_or_else(|| "never".to_string(), |y| y.to_string()),
        ),
    ];
    push_rows(&mut out, &rows);
    out
}

fn pension_table(projection: &PensionProjection) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<8} {:>12}", "Year", "Salary");
    for path in PensionPath::ALL {
        let _ = write!(out, " {:>16}", path.label());
    }
    out.push('\n');
    for year in &projection.years {
        pension_row(&mut out, year);
    }

    out.push('\n');
    let _ = writeln!(
        out,
        "{:<16} {:>16} {:>16} {:>10} {:>10}",
        "Path", "Net worth", "Invested", "ROE", "CAGR"
    );
    for path in &projection.summary.paths {
        let _ = writeln!(
            out,
            "{:<16} {:>16} {:>16} {:>10} {:>10}",
            path.path.label(),
            format_euro_short(path.net_worth),
            format_euro_short(path.equity_invested),
            format_optional_percentage(path.roe),
            format_optional_percentage(path.cagr),
        );
    }
    out.push('\n');
    push_rows(
        &mut out,
        &[
            ("Best path", projection.summary.best.label().to_string()),
            (
                "Fund minus company",
                format_euro(projection.summary.net_worth_difference),
            ),
        ],
    );
    out
}

fn pension_row(out: &mut String, year: &RetirementYear) {
    let _ = write!(
        out,
        "{:<8} {:>12}",
        year_label(year.year, year.calendar_year),
        format_euro_short(year.salary)
    );
    for path in PensionPath::ALL {
        let _ = write!(out, " {:>16}", format_euro_short(year.path(path).net_worth));
    }
    out.push('\n');
}

pub fn render_monte_carlo_table(summary: &MonteCarloSummary) -> String {
    let mut out = String::new();
    push_rows(
        &mut out,
        &[
            ("Iterations", summary.iterations.to_string()),
            ("Seed", summary.seed.to_string()),
            ("Mean", format_euro(summary.mean)),
            ("P5", format_euro(summary.p5)),
            ("P50", format_euro(summary.p50)),
            ("P95", format_euro(summary.p95)),
            ("Positive runs", format_percentage(summary.positive_ratio)),
        ],
    );
    out
}

fn push_rows(out: &mut String, rows: &[(&str, String)]) {
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in rows {
        let _ = writeln!(out, "{label:<width$}  {value}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fincompare_core::config::{HousingConfig, PensionConfig};
    use fincompare_core::{ScenarioConfig, monte_carlo_simulate, simulate};

    fn housing() -> ScenarioResult {
        let config = ScenarioConfig::Housing(HousingConfig {
            years: 5,
            start_year: Some(2026),
            ..Default::default()
        });
        simulate(&config, 1).unwrap()
    }

    #[test]
    fn test_housing_table_has_a_row_per_year() {
        let table = render_table(&housing());
        assert!(table.starts_with("Year"));
        assert!(table.contains("  1 2026"));
        assert!(table.contains("  5 2030"));
        assert!(!table.contains("  6 2031"));
        assert!(table.contains("Buy minus rent"));
        assert!(table.contains("Break-even year"));
    }

    #[test]
    fn test_pension_table_lists_every_path() {
        let config = ScenarioConfig::Pension(PensionConfig {
            years: 3,
            ..Default::default()
        });
        let table = render_table(&simulate(&config, 1).unwrap());
        for path in PensionPath::ALL {
            assert!(table.contains(path.label()));
        }
        assert!(table.contains("Best path"));
    }

    #[test]
    fn test_json_is_tagged_and_rounded() {
        let json = render_json(&housing()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "housing");
        assert_eq!(value["years"].as_array().unwrap().len(), 5);
        let cost = value["summary"]["total_purchase_cost"].as_f64().unwrap();
        assert!(((cost * 100.0).round() - cost * 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_monte_carlo_table() {
        let config = ScenarioConfig::Housing(HousingConfig {
            years: 5,
            ..Default::default()
        });
        let summary = monte_carlo_simulate(&config, 10, 3).unwrap();
        let table = render_monte_carlo_table(&summary);
        assert!(table.starts_with("Iterations"));
        assert!(table.lines().any(|l| l.starts_with("Seed") && l.ends_with(" 3")));
        assert!(table.contains("P95"));
    }
}
