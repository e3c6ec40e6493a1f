use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::market::RateSpec;
use crate::reference::ReferenceData;
use crate::taxes::IncomeBrackets;

/// Statutory severance accrual, percent of the gross salary
pub const DEFAULT_TFR_RATE: f64 = 6.91;

/// Yearly ceiling on deductible pension contributions, euros
pub const DEDUCTION_CAP: f64 = 5_164.57;

/// Keep the severance with the employer, move it to a pension fund, or
/// move it and add a voluntary contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PensionConfig {
    pub years: u32,
    pub start_year: Option<i16>,

    /// Gross yearly salary (RAL) of the first year
    pub gross_salary: f64,
    pub salary_growth: RateSpec,
    pub inflation: RateSpec,
    pub tfr_rate: f64,

    /// Percent of the gross salary
    pub employee_contribution_pct: f64,
    pub employer_contribution_pct: f64,
    /// Voluntary extra contribution of the enhanced path
    pub additional_contribution_pct: f64,

    pub fund_return: RateSpec,
    pub fund_equity_ratio: f64,
    /// ISC, percent per year, deducted from the fund return
    pub fund_annual_cost: f64,

    /// Return of the alternative investment funded by the budget difference
    pub opportunity_return: RateSpec,
    pub opportunity_equity_ratio: f64,

    pub deduction_cap: f64,
    pub income_brackets: IncomeBrackets,

    /// Collective agreement used to fill contribution percentages
    pub ccnl: Option<String>,
    pub fund: Option<FundSelection>,
}

impl Default for PensionConfig {
    fn default() -> Self {
        Self {
            years: 30,
            start_year: None,
            gross_salary: 30_000.0,
            salary_growth: RateSpec::fixed(1.0),
            inflation: RateSpec::fixed(2.0),
            tfr_rate: DEFAULT_TFR_RATE,
            employee_contribution_pct: 1.2,
            employer_contribution_pct: 2.0,
            additional_contribution_pct: 3.0,
            fund_return: RateSpec::fixed(4.0),
            fund_equity_ratio: 50.0,
            fund_annual_cost: 0.4,
            opportunity_return: RateSpec::fixed(5.0),
            opportunity_equity_ratio: 100.0,
            deduction_cap: DEDUCTION_CAP,
            income_brackets: IncomeBrackets::default(),
            ccnl: None,
            fund: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundSelection {
    /// Defaults to the fund negotiated by the CCNL
    #[serde(default)]
    pub name: Option<String>,
    pub compartment: String,
}

impl PensionConfig {
    /// Fill contribution rates and fund assumptions from reference tables.
    ///
    /// The employee contribution is raised to the CCNL minimum when lower,
    /// since the employer match depends on it. The fund return keeps its
    /// configured variation around the historical mean.
    pub fn apply_reference(&mut self, reference: &ReferenceData) -> Result<()> {
        let mut negotiated_fund = None;
        if let Some(ccnl) = &self.ccnl {
            let contribution = reference.ccnl.get(ccnl)?;
            self.employee_contribution_pct = self
                .employee_contribution_pct
                .max(contribution.min_employee_pct);
            self.employer_contribution_pct = contribution.employer_pct;
            negotiated_fund = contribution.fund.clone();
            tracing::debug!(ccnl = %ccnl, ?contribution, "applied ccnl contribution");
        }

        if let Some(selection) = &self.fund {
            let name = selection
                .name
                .clone()
                .or(negotiated_fund)
                .ok_or_else(|| ConfigError::UnknownReference {
                    table: "fund returns",
                    key: format!("?/{}", selection.compartment),
                })?;
            let compartment = reference.funds.compartment(&name, &selection.compartment)?;
            self.fund_return.mean = compartment.return_10y;
            self.fund_equity_ratio = compartment.equity_ratio;
            self.fund_annual_cost = compartment.annual_cost;
            tracing::debug!(fund = %name, compartment = %selection.compartment, "applied fund returns");
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        super::check_years(self.years)?;
        if self.gross_salary <= 0.0 {
            return Err(ConfigError::non_positive("gross salary", self.gross_salary));
        }
        for spec in [
            &self.salary_growth,
            &self.inflation,
            &self.fund_return,
            &self.opportunity_return,
        ] {
            spec.validate()?;
        }
        Ok(())
    }
}
