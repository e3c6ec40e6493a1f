//! Tax rate resolution
//!
//! Maps an [`AssetType`] plus a [`TaxContext`] to a percentage rate (0-100).
//! Each asset type resolves to a [`RateRule`]: a flat rate, an equity/bond
//! blend, or the progressive income brackets.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Capital gains on equity and non-whitelisted instruments
pub const EQUITY_CAPITAL_GAIN_RATE: f64 = 26.0;
/// Government and whitelisted bonds
pub const WHITELISTED_BOND_RATE: f64 = 12.5;
/// Yearly tax on pension fund returns (equity share)
pub const RETIREMENT_FUND_RETURN_RATE: f64 = 20.0;
/// Yearly tax on the revaluation of severance left with the employer
pub const COMPANY_REVALUATION_RATE: f64 = 17.0;
/// Placeholder rate for mixed instruments without a known composition
pub const MIXED_RATE: f64 = 26.0;
pub const NO_TAXATION_RATE: f64 = 0.0;

/// Withdrawal tax for members with at most `RETIREMENT_FUND_THRESHOLD_YEARS` of membership
pub const RETIREMENT_FUND_BELOW_THRESHOLD_RATE: f64 = 23.0;
/// Starting point of the tenure-based reduction
pub const RETIREMENT_FUND_THRESHOLD_RATE: f64 = 15.0;
pub const RETIREMENT_FUND_THRESHOLD_YEARS: u32 = 15;
/// Reduction per year of membership beyond the threshold
pub const RETIREMENT_FUND_YEARLY_REDUCTION: f64 = 0.30;
pub const RETIREMENT_FUND_MIN_RATE: f64 = 9.0;

/// Number of trailing salary years averaged for the severance tax rate
pub const COMPANY_TAX_WINDOW_YEARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    RetirementFund,
    EnhancedRetirementFund,
    OpportunityCost,
    Company,
    Mixed,
    Equity,
    Bond,
    Income,
    NoTaxation,
}

impl FromStr for AssetType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let asset = match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "retirement_fund" => AssetType::RetirementFund,
            "enhanced_retirement_fund" => AssetType::EnhancedRetirementFund,
            "opportunity_cost" => AssetType::OpportunityCost,
            "company" => AssetType::Company,
            "mixed" => AssetType::Mixed,
            "equity" => AssetType::Equity,
            "bond" => AssetType::Bond,
            "income" => AssetType::Income,
            "no_taxation" => AssetType::NoTaxation,
            _ => return Err(ConfigError::UnknownAssetType(s.to_string())),
        };
        Ok(asset)
    }
}

/// A single progressive bracket: `rate` percent applies to income above `threshold`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub threshold: f64,
    pub rate: f64,
}

/// Italian personal income tax brackets (2024)
pub const IRPEF_2024: &[TaxBracket] = &[
    TaxBracket {
        threshold: 0.0,
        rate: 23.0,
    },
    TaxBracket {
        threshold: 28_000.0,
        rate: 35.0,
    },
    TaxBracket {
        threshold: 50_000.0,
        rate: 43.0,
    },
];

/// Owned bracket table used in configurations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncomeBrackets(pub Vec<TaxBracket>);

impl Default for IncomeBrackets {
    fn default() -> Self {
        IncomeBrackets(IRPEF_2024.to_vec())
    }
}

impl IncomeBrackets {
    pub fn as_slice(&self) -> &[TaxBracket] {
        &self.0
    }
}

/// Inputs a rate rule may need
#[derive(Debug, Clone, Copy)]
pub struct TaxContext<'a> {
    /// Equity share of the asset, in percent
    pub equity_ratio: Option<f64>,
    pub gross_income: Option<f64>,
    /// Forces the NoTaxation rate (legal exemptions)
    pub tax_free: bool,
    pub brackets: &'a [TaxBracket],
}

impl Default for TaxContext<'_> {
    fn default() -> Self {
        Self {
            equity_ratio: None,
            gross_income: None,
            tax_free: false,
            brackets: IRPEF_2024,
        }
    }
}

impl TaxContext<'_> {
    #[must_use]
    pub fn with_equity_ratio(mut self, ratio: Option<f64>) -> Self {
        self.equity_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_income(mut self, income: f64) -> Self {
        self.gross_income = Some(income);
        self
    }

    #[must_use]
    pub fn tax_free(mut self, tax_free: bool) -> Self {
        self.tax_free = tax_free;
        self
    }
}

/// How a rate is derived for an asset type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateRule {
    Flat(f64),
    /// Equity share taxed at `equity_rate`, the rest at `bond_rate`.
    /// Without an equity ratio, `default_ratio` is used; `None` makes it mandatory.
    Blended {
        equity_rate: f64,
        bond_rate: f64,
        default_ratio: Option<f64>,
    },
    Progressive,
}

impl AssetType {
    pub fn rate_rule(self) -> RateRule {
        match self {
            AssetType::RetirementFund | AssetType::EnhancedRetirementFund => RateRule::Blended {
                equity_rate: RETIREMENT_FUND_RETURN_RATE,
                bond_rate: WHITELISTED_BOND_RATE,
                default_ratio: None,
            },
            AssetType::OpportunityCost => RateRule::Blended {
                equity_rate: EQUITY_CAPITAL_GAIN_RATE,
                bond_rate: WHITELISTED_BOND_RATE,
                default_ratio: Some(100.0),
            },
            AssetType::Company => RateRule::Flat(COMPANY_REVALUATION_RATE),
            AssetType::Mixed => RateRule::Flat(MIXED_RATE),
            AssetType::Equity => RateRule::Flat(EQUITY_CAPITAL_GAIN_RATE),
            AssetType::Bond => RateRule::Flat(WHITELISTED_BOND_RATE),
            AssetType::Income => RateRule::Progressive,
            AssetType::NoTaxation => RateRule::Flat(NO_TAXATION_RATE),
        }
    }
}

impl RateRule {
    fn resolve(self, asset: AssetType, ctx: &TaxContext<'_>) -> Result<f64> {
        match self {
            RateRule::Flat(rate) => Ok(rate),
            RateRule::Blended {
                equity_rate,
                bond_rate,
                default_ratio,
            } => {
                let ratio = ctx
                    .equity_ratio
                    .or(default_ratio)
                    .ok_or(ConfigError::MissingContext {
                        field: "equity ratio",
                        asset,
                    })?;
                Ok(blended_rate(ratio, equity_rate, bond_rate))
            }
            RateRule::Progressive => {
                let income = ctx.gross_income.ok_or(ConfigError::MissingContext {
                    field: "gross income",
                    asset,
                })?;
                effective_income_rate(income, ctx.brackets)
            }
        }
    }
}

/// Resolve the tax rate (percent) for an asset in the given context
pub fn rate_for(asset: AssetType, ctx: &TaxContext<'_>) -> Result<f64> {
    if ctx.tax_free {
        return Ok(NO_TAXATION_RATE);
    }
    asset.rate_rule().resolve(asset, ctx)
}

/// Weighted rate for a portfolio holding `equity_ratio` percent of equity
#[inline]
pub fn blended_rate(equity_ratio: f64, equity_rate: f64, bond_rate: f64) -> f64 {
    let ratio = equity_ratio.clamp(0.0, 100.0) / 100.0;
    ratio * equity_rate + (1.0 - ratio) * bond_rate
}

/// Tax owed on `income` under progressive `brackets` (rates in percent)
pub fn income_tax(income: f64, brackets: &[TaxBracket]) -> f64 {
    if income <= 0.0 || brackets.is_empty() {
        return 0.0;
    }

    let mut tax = 0.0;
    for (i, bracket) in brackets.iter().enumerate() {
        if income <= bracket.threshold {
            break;
        }
        let next_threshold = brackets
            .get(i + 1)
            .map(|b| b.threshold)
            .unwrap_or(f64::INFINITY);

        let taxable_in_bracket = income.min(next_threshold) - bracket.threshold;
        tax += taxable_in_bracket * bracket.rate / 100.0;
    }

    tax
}

/// Effective (average) income tax rate in percent
pub fn effective_income_rate(income: f64, brackets: &[TaxBracket]) -> Result<f64> {
    if income <= 0.0 {
        return Err(ConfigError::non_positive("gross income", income));
    }
    Ok(income_tax(income, brackets) / income * 100.0)
}

/// Severance tax rate: average effective income tax over the trailing window
/// `[year - 5, year)` of `salaries`, clipped to the available history.
///
/// `year` is the zero-based index of the year being taxed, so its own salary
/// is excluded; at `year == 0` the first salary alone is used.
pub fn company_tax_rate(salaries: &[f64], year: usize, brackets: &[TaxBracket]) -> Result<f64> {
    let end = year.max(1).min(salaries.len());
    let start = end.saturating_sub(COMPANY_TAX_WINDOW_YEARS);
    let window = &salaries[start..end];

    let total_income: f64 = window.iter().sum();
    if total_income <= 0.0 {
        return Err(ConfigError::non_positive("salary history", total_income));
    }
    let total_tax: f64 = window.iter().map(|s| income_tax(*s, brackets)).sum();
    Ok(total_tax / total_income * 100.0)
}

/// Pension fund withdrawal rate after `years` of membership
pub fn retirement_fund_tax_rate(years: u32) -> f64 {
    if years <= RETIREMENT_FUND_THRESHOLD_YEARS {
        return RETIREMENT_FUND_BELOW_THRESHOLD_RATE;
    }
    let extra = f64::from(years - RETIREMENT_FUND_THRESHOLD_YEARS);
    (RETIREMENT_FUND_THRESHOLD_RATE - RETIREMENT_FUND_YEARLY_REDUCTION * extra)
        .max(RETIREMENT_FUND_MIN_RATE)
}
