//! Purchase vs rent cost projection
//!
//! Builds the yearly cash flows of buying (one-time costs, maintenance,
//! condo fees, property tax, mortgage installments minus tax credits) and of
//! renting (rent revalued at each contract renewal, ordinary maintenance,
//! condo fees, registration tax). When investing the difference is enabled,
//! the side that spends less in a year puts the gap into a compounding pot,
//! so both sides always part with the same amount of cash.

use rand::Rng;

use crate::compound::{
    CompoundPerformance, Contribution, GrowthParams, grow_with_rates, revaluation_series,
};
use crate::config::{HousingConfig, InvestmentConfig, calendar_year};
use crate::error::{ConfigError, Result};
use crate::metrics;
use crate::model::{
    AnnualOverviewItem, HousingProjection, HousingSummary, InitialCosts, PathYear,
};
use crate::mortgage::{self, MortgageSchedule};
use crate::taxes::{AssetType, TaxContext, rate_for};

/// Yearly rates (percent) driving one housing run
#[derive(Debug, Clone, PartialEq)]
pub struct HousingRates {
    pub inflation: Vec<f64>,
    pub house_revaluation: Vec<f64>,
    /// Empty when the difference is not invested
    pub investment_return: Vec<f64>,
}

impl HousingRates {
    /// Draw every rate of the run, in a fixed order
    pub fn sample<R: Rng + ?Sized>(config: &HousingConfig, rng: &mut R) -> Result<Self> {
        let years = config.years as usize;
        let inflation = config.inflation.sample_sequence(rng, years)?;
        let house_revaluation = config.house_revaluation.sample_sequence(rng, years)?;
        let investment_return = match &config.invest_difference {
            Some(invest) => invest.annual_return.sample_sequence(rng, years)?,
            None => Vec::new(),
        };
        Ok(Self {
            inflation,
            house_revaluation,
            investment_return,
        })
    }

    /// Every rate at its mean
    pub fn expected(config: &HousingConfig) -> Self {
        let years = config.years as usize;
        Self {
            inflation: vec![config.inflation.mean; years],
            house_revaluation: vec![config.house_revaluation.mean; years],
            investment_return: config
                .invest_difference
                .as_ref()
                .map_or_else(Vec::new, |i| vec![i.annual_return.mean; years]),
        }
    }
}

fn first_years<'a>(rates: &'a [f64], years: usize, field: &'static str) -> Result<&'a [f64]> {
    rates.get(..years).ok_or(ConfigError::InvalidState { field })
}

/// Cash flows of both paths for one year, before any investing
#[derive(Debug, Clone, Copy)]
struct YearFlows {
    house_value: f64,
    condo_fee: f64,
    monthly_rent: f64,
    purchase_cashflow: f64,
    purchase_taxes: f64,
    purchase_benefits: f64,
    rent_cashflow: f64,
    rent_taxes: f64,
}

/// Project both paths over `config.years`
pub fn project(config: &HousingConfig, rates: &HousingRates) -> Result<HousingProjection> {
    config.validate()?;
    let years = config.years as usize;
    tracing::debug!(years, house_price = config.house_price, "housing projection started");

    let house_values = revaluation_series(
        config.house_price,
        first_years(&rates.house_revaluation, years, "house_revaluation")?,
    )?;
    let inflation = first_years(&rates.inflation, years, "inflation")?;
    let condo_fees = revaluation_series(config.condo_fee_monthly * 12.0, inflation)?;

    let principal = config.mortgage_principal();
    let schedule = match &config.mortgage {
        Some(m) => mortgage::amortize(principal, m.annual_rate, m.term_years, m.interest_tax_credit)?,
        None => MortgageSchedule::none(),
    };
    let initial = initial_costs(config, principal);
    let flows = year_flows(config, &house_values, &condo_fees, inflation, &schedule, &initial);

    let pots = match &config.invest_difference {
        Some(invest) => Some(InvestedDifference::grow(
            invest,
            &flows,
            first_years(&rates.investment_return, years, "investment_return")?,
        )?),
        None => None,
    };

    let mut items = Vec::with_capacity(years);
    let mut purchase_totals = Totals::default();
    let mut rent_totals = Totals::default();

    for (index, flow) in flows.iter().enumerate() {
        let year = index as u32 + 1;
        let purchase_pot = pots.as_ref().map(|p| p.purchase[index]);
        let rent_pot = pots.as_ref().map(|p| p.rent[index]);
        let liquidate = |pot: Option<CompoundPerformance>| {
            pots.as_ref()
                .zip(pot)
                .map_or(0.0, |(p, perf)| p.liquidation_value(&perf))
        };

        purchase_totals.add(flow.purchase_cashflow, flow.purchase_taxes, flow.purchase_benefits);
        rent_totals.add(flow.rent_cashflow, flow.rent_taxes, 0.0);

        let equity = flow.house_value - schedule.balance_after(year);
        let purchase = purchase_totals.path_year(
            equity + liquidate(purchase_pot),
            purchase_pot,
            schedule.year(year).copied(),
        );
        let rent = rent_totals.path_year(liquidate(rent_pot), rent_pot, None);

        tracing::trace!(
            year,
            purchase_cashflow = flow.purchase_cashflow,
            rent_cashflow = flow.rent_cashflow,
            "housing year"
        );

        items.push(AnnualOverviewItem {
            year,
            calendar_year: calendar_year(config.start_year, year),
            house_value: flow.house_value,
            condo_fee: flow.condo_fee,
            monthly_rent: flow.monthly_rent,
            purchase,
            rent,
        });
    }

    let summary = summarize(config, &items, &schedule, initial)?;
    tracing::debug!(
        net_worth_difference = summary.net_worth_difference,
        break_even_year = ?summary.break_even_year,
        "housing projection finished"
    );

    Ok(HousingProjection {
        years: items,
        summary,
    })
}

fn initial_costs(config: &HousingConfig, principal: f64) -> InitialCosts {
    let costs = &config.purchase;
    InitialCosts {
        down_payment: config.down_payment(),
        agency_fee: config.house_price * costs.agency_fee_pct / 100.0,
        notary_fee: costs.notary_fee,
        purchase_taxes: config.house_price * costs.purchase_tax_pct / 100.0,
        renovation: costs.renovation_cost,
        mortgage_opening: config
            .mortgage
            .as_ref()
            .map_or(0.0, |m| mortgage::opening_costs(principal, m.opening_cost_pct)),
        rent_agency_fee: config.rent.monthly_rent * config.rent.agency_fee_months,
    }
}

fn year_flows(
    config: &HousingConfig,
    house_values: &[f64],
    condo_fees: &[f64],
    inflation: &[f64],
    schedule: &MortgageSchedule,
    initial: &InitialCosts,
) -> Vec<YearFlows> {
    let years = config.years;
    let rent = &config.rent;
    // A contractual revaluation compounds over the contract; otherwise the
    // rent follows the inflation of the years the contract ran
    let renewal_factor = |year: u32| match rent.revaluation {
        Some(rate) => (1.0 + rate / 100.0).powi(rent.contract_years as i32),
        None => inflation[(year - rent.contract_years) as usize..year as usize]
            .iter()
            .map(|r| 1.0 + r / 100.0)
            .product(),
    };
    let mut monthly_rent = rent.monthly_rent;
    let mut flows = Vec::with_capacity(years as usize);

    for year in 1..=years {
        let index = year as usize;
        let house_value = house_values[index];
        let condo_fee = condo_fees[index - 1];
        let first_year = year == 1;

        let installment = schedule.year(year);
        let property_tax = house_value * config.property_tax_pct / 100.0;
        let maintenance =
            house_value * (config.ordinary_maintenance_pct + config.extraordinary_maintenance_pct) / 100.0;
        let purchase_benefits = installment.map_or(0.0, |m| m.tax_benefit)
            + config.purchase.renovation_credit(year);
        let purchase_cashflow = if first_year { initial.purchase_total() } else { 0.0 }
            + maintenance
            + condo_fee
            + property_tax
            + installment.map_or(0.0, |m| m.payments())
            - purchase_benefits;

        let annual_rent = monthly_rent * 12.0;
        let registration_tax = annual_rent * rent.registration_tax_pct / 100.0;
        let rent_cashflow = annual_rent
            + house_value * config.ordinary_maintenance_pct / 100.0
            + condo_fee
            + registration_tax
            + if first_year { initial.rent_agency_fee } else { 0.0 };

        flows.push(YearFlows {
            house_value,
            condo_fee,
            monthly_rent,
            purchase_cashflow,
            purchase_taxes: property_tax + if first_year { initial.purchase_taxes } else { 0.0 },
            purchase_benefits,
            rent_cashflow,
            rent_taxes: registration_tax,
        });

        // Renewals revalue the rent for the next contract; none after the last year
        if year % rent.contract_years == 0 && year < years {
            monthly_rent *= renewal_factor(year);
        }
    }

    flows
}

/// The two pots funded with the yearly cash-flow gap
struct InvestedDifference {
    purchase: Vec<CompoundPerformance>,
    rent: Vec<CompoundPerformance>,
    liquidation_rate: f64,
}

impl InvestedDifference {
    fn grow(invest: &InvestmentConfig, flows: &[YearFlows], rates: &[f64]) -> Result<Self> {
        let (purchase_savings, rent_savings): (Vec<f64>, Vec<f64>) = flows
            .iter()
            .map(|f| {
                let gap = f.purchase_cashflow - f.rent_cashflow;
                ((-gap).max(0.0), gap.max(0.0))
            })
            .unzip();

        let params = |savings: Vec<f64>| GrowthParams {
            initial_capital: 0.0,
            contribution: Contribution::PerYear(savings),
            frequency: invest.frequency,
            annual_tax: Some(invest.annual_tax),
            ..Default::default()
        };
        let liquidation_rate = rate_for(
            AssetType::OpportunityCost,
            &TaxContext::default().with_equity_ratio(Some(invest.equity_ratio)),
        )?;

        Ok(Self {
            purchase: grow_with_rates(&params(purchase_savings), rates)?,
            rent: grow_with_rates(&params(rent_savings), rates)?,
            liquidation_rate,
        })
    }

    /// Pot value after capital gains tax on a sale at year end
    fn liquidation_value(&self, pot: &CompoundPerformance) -> f64 {
        let gain = (pot.capital - pot.contributions).max(0.0);
        pot.capital - gain * self.liquidation_rate / 100.0
    }
}

#[derive(Debug, Default)]
struct Totals {
    cost: f64,
    taxes: f64,
    benefits: f64,
    last_cashflow: f64,
}

impl Totals {
    fn add(&mut self, cashflow: f64, taxes: f64, benefits: f64) {
        self.cost += cashflow;
        self.taxes += taxes;
        self.benefits += benefits;
        self.last_cashflow = cashflow;
    }

    fn path_year(
        &self,
        net_worth: f64,
        opportunity_cost: Option<CompoundPerformance>,
        mortgage: Option<mortgage::MortgageAnnualOverview>,
    ) -> PathYear {
        let invested = opportunity_cost.map_or(0.0, |p| p.contributions);
        PathYear {
            cashflow: self.last_cashflow,
            cumulative_cost: self.cost,
            cumulative_taxes: self.taxes,
            cumulative_tax_benefits: self.benefits,
            opportunity_cost,
            mortgage,
            net_worth,
            net_position: net_worth - self.cost - invested,
        }
    }
}

fn summarize(
    config: &HousingConfig,
    items: &[AnnualOverviewItem],
    schedule: &MortgageSchedule,
    initial_costs: InitialCosts,
) -> Result<HousingSummary> {
    let last = items.last().ok_or(ConfigError::YearsOutOfRange(config.years))?;
    let purchase_spent = last.purchase.cumulative_cost
        + last.purchase.opportunity_cost.map_or(0.0, |p| p.contributions);

    Ok(HousingSummary {
        initial_costs,
        monthly_mortgage_payment: schedule.monthly_payment,
        total_interest: schedule.total_interest(),
        total_purchase_cost: last.purchase.cumulative_cost,
        total_rent_cost: last.rent.cumulative_cost,
        final_house_value: last.house_value,
        house_cagr: metrics::cagr(config.house_price, last.house_value, config.years)?,
        house_apr: metrics::apr(config.house_price, last.house_value, config.years)?,
        purchase_roi: metrics::roe(last.purchase.net_worth, purchase_spent)?,
        purchase_net_worth: last.purchase.net_worth,
        rent_net_worth: last.rent.net_worth,
        net_worth_difference: last.purchase.net_position - last.rent.net_position,
        break_even_year: items
            .iter()
            .find(|item| item.purchase.net_position >= item.rent.net_position)
            .map(|item| item.year),
    })
}
