//! Severance (TFR) destination comparison
//!
//! Three paths receive the same yearly budget:
//! - company: the severance stays with the employer and is revalued
//! - fund: severance plus employee and employer contributions go to a pension fund
//! - enhanced fund: as fund, with an additional voluntary contribution
//!
//! Whatever part of the budget a path does not put into its own vehicle
//! (net of the income tax it saves through deductions) is invested on the
//! side, so the final net worths are directly comparable.

use rand::Rng;

use crate::compound::revaluation_series;
use crate::config::{PensionConfig, calendar_year};
use crate::error::{ConfigError, Result};
use crate::ledger::{self, InvestmentPerformance};
use crate::metrics;
use crate::model::{
    PathSummary, PensionPath, PensionPathYear, PensionProjection, PensionSummary, RetirementYear,
};
use crate::taxes::{
    AssetType, TaxBracket, TaxContext, company_tax_rate, income_tax, retirement_fund_tax_rate,
};

/// Fixed part of the yearly severance revaluation, percent
pub const COMPANY_FIXED_REVALUATION: f64 = 1.5;
/// Share of inflation added to the severance revaluation
pub const COMPANY_INFLATION_SHARE: f64 = 0.75;

/// Yearly rates (percent) driving one pension run
#[derive(Debug, Clone, PartialEq)]
pub struct PensionRates {
    pub inflation: Vec<f64>,
    pub salary_growth: Vec<f64>,
    pub fund_return: Vec<f64>,
    pub opportunity_return: Vec<f64>,
}

impl PensionRates {
    /// Draw every rate of the run, in a fixed order
    pub fn sample<R: Rng + ?Sized>(config: &PensionConfig, rng: &mut R) -> Result<Self> {
        let years = config.years as usize;
        Ok(Self {
            inflation: config.inflation.sample_sequence(rng, years)?,
            salary_growth: config.salary_growth.sample_sequence(rng, years)?,
            fund_return: config.fund_return.sample_sequence(rng, years)?,
            opportunity_return: config.opportunity_return.sample_sequence(rng, years)?,
        })
    }

    pub fn expected(config: &PensionConfig) -> Self {
        let years = config.years as usize;
        Self {
            inflation: vec![config.inflation.mean; years],
            salary_growth: vec![config.salary_growth.mean; years],
            fund_return: vec![config.fund_return.mean; years],
            opportunity_return: vec![config.opportunity_return.mean; years],
        }
    }

    fn check(&self, years: usize) -> Result<()> {
        let series = [
            ("inflation", &self.inflation),
            ("salary_growth", &self.salary_growth),
            ("fund_return", &self.fund_return),
            ("opportunity_return", &self.opportunity_return),
        ];
        for (field, rates) in series {
            if rates.len() < years {
                return Err(ConfigError::InvalidState { field });
            }
        }
        Ok(())
    }
}

/// Employee contribution relief for one year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deduction {
    /// Employee contribution subtracted from taxable income
    pub deducted: f64,
    pub tax_saving: f64,
}

/// Deduct employee contributions from taxable income.
///
/// Employer contributions count toward `cap` first; the employee share
/// deducts whatever room is left.
pub fn deduction(
    salary: f64,
    employee: f64,
    employer: f64,
    cap: f64,
    brackets: &[TaxBracket],
) -> Deduction {
    let deducted = employee.min((cap - employer).max(0.0)).max(0.0);
    let tax_saving = income_tax(salary, brackets) - income_tax(salary - deducted, brackets);
    Deduction {
        deducted,
        tax_saving,
    }
}

/// Yearly flows of one path
#[derive(Debug, Default)]
struct PathFlows {
    deposits: Vec<f64>,
    tax_savings: Vec<f64>,
    /// Amount the exit tax applies to, per year (not cumulative)
    taxable_deposits: Vec<f64>,
    opportunity_deposits: Vec<f64>,
}

impl PathFlows {
    fn push(&mut self, deposit: f64, tax_saving: f64, taxable: f64, opportunity: f64) {
        self.deposits.push(deposit);
        self.tax_savings.push(tax_saving);
        self.taxable_deposits.push(taxable);
        self.opportunity_deposits.push(opportunity);
    }
}

pub fn project(config: &PensionConfig, rates: &PensionRates) -> Result<PensionProjection> {
    config.validate()?;
    let years = config.years as usize;
    rates.check(years)?;
    tracing::debug!(years, gross_salary = config.gross_salary, "pension projection started");

    let brackets = config.income_brackets.as_slice();
    let mut salaries = revaluation_series(config.gross_salary, &rates.salary_growth[..years])?;
    salaries.truncate(years);

    let mut company = PathFlows::default();
    let mut fund = PathFlows::default();
    let mut enhanced = PathFlows::default();
    let mut tfrs = Vec::with_capacity(years);

    for salary in &salaries {
        let pct = |p: f64| salary * p / 100.0;
        let tfr = pct(config.tfr_rate);
        let employee = pct(config.employee_contribution_pct);
        let employer = pct(config.employer_contribution_pct);
        let additional = pct(config.additional_contribution_pct);
        let budget = employee + additional;
        let employer_deducted = employer.min(config.deduction_cap);

        company.push(tfr, 0.0, tfr, budget);

        let relief = deduction(*salary, employee, employer, config.deduction_cap, brackets);
        fund.push(
            tfr + employee + employer,
            relief.tax_saving,
            tfr + employer_deducted + relief.deducted,
            budget - (employee - relief.tax_saving),
        );

        let own = employee + additional;
        let relief = deduction(*salary, own, employer, config.deduction_cap, brackets);
        enhanced.push(
            tfr + own + employer,
            relief.tax_saving,
            tfr + employer_deducted + relief.deducted,
            budget - (own - relief.tax_saving),
        );

        tfrs.push(tfr);
    }

    let revaluation: Vec<f64> = rates.inflation[..years]
        .iter()
        .map(|inflation| COMPANY_FIXED_REVALUATION + COMPANY_INFLATION_SHARE * inflation)
        .collect();
    let fund_growth: Vec<f64> = rates.fund_return[..years]
        .iter()
        .map(|r| r - config.fund_annual_cost)
        .collect();
    let opportunity_rates = &rates.opportunity_return[..years];

    let base = TaxContext {
        brackets,
        ..Default::default()
    };
    let fund_ctx = base.with_equity_ratio(Some(config.fund_equity_ratio));
    let opportunity_ctx = base.with_equity_ratio(Some(config.opportunity_equity_ratio));

    // Severance paid at the end of year N is taxed on the salaries before it
    let company_exit: Vec<f64> = (0..years)
        .map(|index| company_tax_rate(&salaries, index, brackets))
        .collect::<Result<_>>()?;
    let fund_exit: Vec<f64> = (1..=years as u32).map(retirement_fund_tax_rate).collect();

    let opportunity = |deposits: &[f64]| {
        ledger::project(
            opportunity_rates,
            deposits,
            AssetType::OpportunityCost,
            opportunity_ctx,
        )
    };

    let company_years = path_years(
        &company,
        ledger::project(&revaluation, &company.deposits, AssetType::Company, base)?,
        opportunity(&company.opportunity_deposits)?,
        &company_exit,
    );
    let fund_years = path_years(
        &fund,
        ledger::project(
            &fund_growth,
            &fund.deposits,
            AssetType::RetirementFund,
            fund_ctx,
        )?,
        opportunity(&fund.opportunity_deposits)?,
        &fund_exit,
    );
    let enhanced_years = path_years(
        &enhanced,
        ledger::project(
            &fund_growth,
            &enhanced.deposits,
            AssetType::EnhancedRetirementFund,
            fund_ctx,
        )?,
        opportunity(&enhanced.opportunity_deposits)?,
        &fund_exit,
    );

    let items: Vec<RetirementYear> = company_years
        .into_iter()
        .zip(fund_years)
        .zip(enhanced_years)
        .enumerate()
        .map(|(index, ((company, fund), enhanced_fund))| {
            let year = index as u32 + 1;
            tracing::trace!(
                year,
                company = company.net_worth,
                fund = fund.net_worth,
                enhanced = enhanced_fund.net_worth,
                "pension year"
            );
            RetirementYear {
                year,
                calendar_year: calendar_year(config.start_year, year),
                salary: salaries[index],
                tfr: tfrs[index],
                company,
                fund,
                enhanced_fund,
            }
        })
        .collect();

    let summary = summarize(config.years, &items)?;
    tracing::debug!(best = ?summary.best, "pension projection finished");

    Ok(PensionProjection {
        years: items,
        summary,
    })
}

fn path_years(
    flows: &PathFlows,
    performance: Vec<InvestmentPerformance>,
    opportunity: Vec<InvestmentPerformance>,
    exit_rates: &[f64],
) -> Vec<PensionPathYear> {
    let mut cumulative_deposits = 0.0;
    let mut cumulative_taxable = 0.0;
    let mut cumulative_opportunity = 0.0;

    performance
        .into_iter()
        .zip(opportunity)
        .enumerate()
        .map(|(index, (performance, opportunity_cost))| {
            cumulative_deposits += flows.deposits[index];
            cumulative_taxable += flows.taxable_deposits[index];
            cumulative_opportunity += flows.opportunity_deposits[index];
            let exit_tax_rate = exit_rates[index];
            let exit_tax = cumulative_taxable * exit_tax_rate / 100.0;
            PensionPathYear {
                deposit: flows.deposits[index],
                cumulative_deposits,
                tax_saving: flows.tax_savings[index],
                net_worth: performance.net_value - exit_tax + opportunity_cost.net_value,
                performance,
                exit_tax_rate,
                exit_tax,
                opportunity_cost,
                opportunity_deposits: cumulative_opportunity,
            }
        })
        .collect()
}

fn summarize(years: u32, items: &[RetirementYear]) -> Result<PensionSummary> {
    let last = items.last().ok_or(ConfigError::YearsOutOfRange(years))?;

    let paths = PensionPath::ALL
        .into_iter()
        .map(|path| -> Result<PathSummary> {
            let outcome = last.path(path);
            let equity = outcome.equity_invested();
            // A path nobody paid into has no meaningful return
            let (roe, cagr) = if equity > 0.0 {
                (
                    Some(metrics::roe(outcome.net_worth, equity)?),
                    metrics::cagr(equity, outcome.net_worth, years)?,
                )
            } else {
                (None, None)
            };
            Ok(PathSummary {
                path,
                net_worth: outcome.net_worth,
                equity_invested: equity,
                roe,
                cagr,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let best = paths
        .iter()
        .fold(&paths[0], |best, p| {
            if p.net_worth > best.net_worth { p } else { best }
        })
        .path;

    Ok(PensionSummary {
        best,
        net_worth_difference: last.fund.net_worth - last.company.net_worth,
        paths,
    })
}
