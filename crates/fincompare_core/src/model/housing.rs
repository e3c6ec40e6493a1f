//! Purchase vs rent output records

use serde::{Deserialize, Serialize};

use crate::compound::CompoundPerformance;
use crate::mortgage::MortgageAnnualOverview;

/// One side of the comparison in a given year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathYear {
    /// Money spent during the year, net of tax benefits
    #[serde(serialize_with = "crate::rounding::cents")]
    pub cashflow: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub cumulative_cost: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub cumulative_taxes: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub cumulative_tax_benefits: f64,
    /// Pot funded with the cash this side saved compared to the other
    pub opportunity_cost: Option<CompoundPerformance>,
    pub mortgage: Option<MortgageAnnualOverview>,
    /// Assets held at year end: home equity and/or the invested pot after liquidation taxes
    #[serde(serialize_with = "crate::rounding::cents")]
    pub net_worth: f64,
    /// Net worth minus everything spent or set aside so far
    #[serde(serialize_with = "crate::rounding::cents")]
    pub net_position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualOverviewItem {
    /// One-based
    pub year: u32,
    pub calendar_year: Option<i16>,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub house_value: f64,
    /// Yearly condo fee, paid on both paths
    #[serde(serialize_with = "crate::rounding::cents")]
    pub condo_fee: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub monthly_rent: f64,
    pub purchase: PathYear,
    pub rent: PathYear,
}

/// One-time costs charged in the first year
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialCosts {
    #[serde(serialize_with = "crate::rounding::cents")]
    pub down_payment: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub agency_fee: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub notary_fee: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub purchase_taxes: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub renovation: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub mortgage_opening: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub rent_agency_fee: f64,
}

impl InitialCosts {
    pub fn purchase_total(&self) -> f64 {
        self.down_payment
            + self.agency_fee
            + self.notary_fee
            + self.purchase_taxes
            + self.renovation
            + self.mortgage_opening
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousingSummary {
    pub initial_costs: InitialCosts,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub monthly_mortgage_payment: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub total_interest: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub total_purchase_cost: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub total_rent_cost: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub final_house_value: f64,
    /// Fractions; `None` when undefined
    pub house_cagr: Option<f64>,
    pub house_apr: f64,
    pub purchase_roi: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub purchase_net_worth: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub rent_net_worth: f64,
    /// Purchase minus rent net position in the last year
    #[serde(serialize_with = "crate::rounding::cents")]
    pub net_worth_difference: f64,
    /// First year buying is ahead of renting
    pub break_even_year: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousingProjection {
    pub years: Vec<AnnualOverviewItem>,
    pub summary: HousingSummary,
}
