use serde::{Deserialize, Serialize};

use crate::compound::{AnnualTax, DEFAULT_FREQUENCY};
use crate::error::{ConfigError, Result};
use crate::market::RateSpec;
use crate::mortgage::{self, DEFAULT_OPENING_COST_PCT, InterestTaxCredit};

/// Buy a house or rent it and invest the difference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HousingConfig {
    pub years: u32,
    /// Calendar year of the first simulated year
    pub start_year: Option<i16>,

    pub house_price: f64,
    /// Yearly change of the house price, percent
    pub house_revaluation: RateSpec,
    /// Yearly inflation, percent; revalues the condo fee
    pub inflation: RateSpec,
    pub condo_fee_monthly: f64,
    /// Paid on both paths, percent of the house value
    pub ordinary_maintenance_pct: f64,
    /// Paid by the owner only, percent of the house value
    pub extraordinary_maintenance_pct: f64,
    /// Property tax (IMU), percent of the house value; zero for a first home
    pub property_tax_pct: f64,

    pub purchase: PurchaseCosts,
    pub mortgage: Option<MortgageConfig>,
    pub rent: RentConfig,
    /// Invest the yearly cash-flow difference on the side that spent less
    pub invest_difference: Option<InvestmentConfig>,
}

impl Default for HousingConfig {
    fn default() -> Self {
        Self {
            years: 30,
            start_year: None,
            house_price: 250_000.0,
            house_revaluation: RateSpec::fixed(1.0),
            inflation: RateSpec::fixed(2.0),
            condo_fee_monthly: 100.0,
            ordinary_maintenance_pct: 0.5,
            extraordinary_maintenance_pct: 0.5,
            property_tax_pct: 0.0,
            purchase: PurchaseCosts::default(),
            mortgage: Some(MortgageConfig::default()),
            rent: RentConfig::default(),
            invest_difference: Some(InvestmentConfig::default()),
        }
    }
}

/// One-time costs of buying
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurchaseCosts {
    /// Percent of the price
    pub agency_fee_pct: f64,
    pub notary_fee: f64,
    /// Registration and cadastral taxes, percent of the price
    pub purchase_tax_pct: f64,
    pub renovation_cost: f64,
    /// Share of the renovation cost returned as a tax credit, percent
    pub renovation_credit_pct: f64,
    pub renovation_credit_years: u32,
}

impl Default for PurchaseCosts {
    fn default() -> Self {
        Self {
            agency_fee_pct: 3.0,
            notary_fee: 2_500.0,
            purchase_tax_pct: 2.0,
            renovation_cost: 0.0,
            renovation_credit_pct: 50.0,
            renovation_credit_years: 10,
        }
    }
}

impl PurchaseCosts {
    /// Credit returned in a one-based year
    pub fn renovation_credit(&self, year: u32) -> f64 {
        if year == 0 || year > self.renovation_credit_years {
            return 0.0;
        }
        self.renovation_cost * self.renovation_credit_pct / 100.0
            / f64::from(self.renovation_credit_years)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MortgageConfig {
    pub principal: f64,
    /// Fixed annual rate, percent
    pub annual_rate: f64,
    pub term_years: u32,
    /// Bank fees, percent of the principal
    pub opening_cost_pct: f64,
    pub interest_tax_credit: Option<InterestTaxCredit>,
}

impl Default for MortgageConfig {
    fn default() -> Self {
        Self {
            principal: 200_000.0,
            annual_rate: 3.0,
            term_years: 25,
            opening_cost_pct: DEFAULT_OPENING_COST_PCT,
            interest_tax_credit: Some(InterestTaxCredit::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentConfig {
    pub monthly_rent: f64,
    /// Yearly revaluation applied at each renewal, percent; when unset the rent
    /// follows the inflation of the years the contract ran
    pub revaluation: Option<f64>,
    pub contract_years: u32,
    /// Agency fee in months of rent, paid in the first year
    pub agency_fee_months: f64,
    /// Lease registration tax, percent of the yearly rent
    pub registration_tax_pct: f64,
}

impl Default for RentConfig {
    fn default() -> Self {
        Self {
            monthly_rent: 900.0,
            revaluation: None,
            contract_years: 4,
            agency_fee_months: 1.0,
            registration_tax_pct: 0.0,
        }
    }
}

/// Where the cash-flow difference is invested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentConfig {
    pub annual_return: RateSpec,
    /// Share of equities, percent; drives the capital gain rate at liquidation
    pub equity_ratio: f64,
    pub annual_tax: AnnualTax,
    pub frequency: u32,
}

impl Default for InvestmentConfig {
    fn default() -> Self {
        Self {
            annual_return: RateSpec::fixed(5.0),
            equity_ratio: 100.0,
            annual_tax: AnnualTax {
                interest_rate: 0.0,
                capital_levy: 0.2,
            },
            frequency: DEFAULT_FREQUENCY,
        }
    }
}

impl HousingConfig {
    pub fn mortgage_principal(&self) -> f64 {
        self.mortgage.as_ref().map_or(0.0, |m| m.principal.max(0.0))
    }

    pub fn down_payment(&self) -> f64 {
        (self.house_price - self.mortgage_principal()).max(0.0)
    }

    pub fn validate(&self) -> Result<()> {
        super::check_years(self.years)?;
        if self.house_price <= 0.0 {
            return Err(ConfigError::non_positive("house price", self.house_price));
        }
        if self.rent.contract_years == 0 {
            return Err(ConfigError::non_positive("rent contract years", 0.0));
        }
        if self.purchase.renovation_credit_years == 0 {
            return Err(ConfigError::non_positive("renovation credit years", 0.0));
        }
        if let Some(mortgage) = &self.mortgage {
            mortgage::check_term(mortgage.term_years)?;
        }
        if let Some(invest) = &self.invest_difference {
            if invest.frequency == 0 {
                return Err(ConfigError::non_positive("compounding frequency", 0.0));
            }
            invest.annual_return.validate()?;
        }
        self.house_revaluation.validate()?;
        self.inflation.validate()?;
        Ok(())
    }
}
