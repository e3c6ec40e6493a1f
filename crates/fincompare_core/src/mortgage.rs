//! Fixed-rate mortgage amortization (French method)

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Terms offered by lenders, in years
pub const MORTGAGE_TERMS: [u32; 5] = [10, 15, 20, 25, 30];

/// Default bank fees for opening a mortgage, percent of the principal
pub const DEFAULT_OPENING_COST_PCT: f64 = 1.5;

/// Deduction on mortgage interest for a first home
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterestTaxCredit {
    /// Percent of eligible interest returned
    pub rate: f64,
    /// Interest paid per year that is eligible for the credit
    pub max_interest: f64,
}

impl Default for InterestTaxCredit {
    fn default() -> Self {
        Self {
            rate: 19.0,
            max_interest: 4_000.0,
        }
    }
}

impl InterestTaxCredit {
    #[inline]
    pub fn benefit(&self, interest_paid: f64) -> f64 {
        interest_paid.clamp(0.0, self.max_interest) * self.rate / 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortgageAnnualOverview {
    /// One-based year
    pub year: u32,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub principal_paid: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub interest_paid: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub cumulative_interest_paid: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub cumulative_principal_paid: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub remaining_balance: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub tax_benefit: f64,
    #[serde(serialize_with = "crate::rounding::cents")]
    pub cumulative_tax_benefit: f64,
}

impl MortgageAnnualOverview {
    /// Total paid to the lender during the year
    pub fn payments(&self) -> f64 {
        self.principal_paid + self.interest_paid
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageSchedule {
    #[serde(serialize_with = "crate::rounding::cents")]
    pub monthly_payment: f64,
    pub annual: Vec<MortgageAnnualOverview>,
}

impl MortgageSchedule {
    /// Schedule of a purchase without mortgage
    pub fn none() -> Self {
        Self {
            monthly_payment: 0.0,
            annual: Vec::new(),
        }
    }

    pub fn total_interest(&self) -> f64 {
        self.annual
            .last()
            .map(|y| y.cumulative_interest_paid)
            .unwrap_or(0.0)
    }

    /// Overview for a one-based year, `None` once the mortgage is closed
    pub fn year(&self, year: u32) -> Option<&MortgageAnnualOverview> {
        if year == 0 {
            return None;
        }
        self.annual.get(year as usize - 1)
    }

    /// Balance still owed at the end of a one-based year
    pub fn balance_after(&self, year: u32) -> f64 {
        match self.year(year) {
            Some(overview) => overview.remaining_balance,
            None if year == 0 => self.annual.first().map_or(0.0, |y| {
                y.remaining_balance + y.principal_paid
            }),
            None => 0.0,
        }
    }
}

/// Constant monthly payment for a loan of `principal` at `monthly_rate` over `months`
pub fn monthly_payment(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    if monthly_rate == 0.0 {
        return principal / f64::from(months);
    }
    let growth = (1.0 + monthly_rate).powi(months as i32);
    principal * monthly_rate * growth / (growth - 1.0)
}

/// Build the yearly schedule of a fixed-rate mortgage.
///
/// A non-positive principal yields an empty schedule.
pub fn amortize(
    principal: f64,
    annual_rate_percent: f64,
    term_years: u32,
    tax_credit: Option<InterestTaxCredit>,
) -> Result<MortgageSchedule> {
    if term_years == 0 {
        return Err(ConfigError::non_positive("mortgage term", 0.0));
    }
    if principal <= 0.0 {
        return Ok(MortgageSchedule::none());
    }

    let monthly_rate = annual_rate_percent / 100.0 / 12.0;
    let total_months = term_years * 12;
    let payment = monthly_payment(principal, monthly_rate, total_months);

    let mut balance = principal;
    let mut month = 0;
    let mut cumulative_interest = 0.0;
    let mut cumulative_principal = 0.0;
    let mut cumulative_benefit = 0.0;
    let mut annual = Vec::with_capacity(term_years as usize);

    for year in 1..=term_years {
        let mut interest_paid = 0.0;
        let mut principal_paid = 0.0;

        for _ in 0..12 {
            if balance <= 0.0 {
                break;
            }
            month += 1;
            let interest = balance * monthly_rate;
            // The last installment settles whatever floating point left behind
            let principal_part = if month == total_months {
                balance
            } else {
                (payment - interest).min(balance)
            };
            balance -= principal_part;
            interest_paid += interest;
            principal_paid += principal_part;
        }

        cumulative_interest += interest_paid;
        cumulative_principal += principal_paid;
        let tax_benefit = tax_credit.map_or(0.0, |credit| credit.benefit(interest_paid));
        cumulative_benefit += tax_benefit;

        annual.push(MortgageAnnualOverview {
            year,
            principal_paid,
            interest_paid,
            cumulative_interest_paid: cumulative_interest,
            cumulative_principal_paid: cumulative_principal,
            remaining_balance: balance.max(0.0),
            tax_benefit,
            cumulative_tax_benefit: cumulative_benefit,
        });
    }

    tracing::debug!(
        principal,
        annual_rate_percent,
        term_years,
        monthly_payment = payment,
        "mortgage schedule built"
    );

    Ok(MortgageSchedule {
        monthly_payment: payment,
        annual,
    })
}

/// One-time bank fees charged in the first year
#[inline]
pub fn opening_costs(principal: f64, opening_cost_pct: f64) -> f64 {
    principal.max(0.0) * opening_cost_pct / 100.0
}

/// Check a term against the terms lenders offer
pub fn check_term(term_years: u32) -> Result<()> {
    if MORTGAGE_TERMS.contains(&term_years) {
        Ok(())
    } else {
        Err(ConfigError::UnsupportedMortgageTerm(term_years))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_mortgage() {
        let schedule = amortize(120_000.0, 2.5, 20, None).unwrap();

        assert!(
            (schedule.monthly_payment - 636.03).abs() < 0.5,
            "monthly payment {}",
            schedule.monthly_payment
        );
        assert!(
            (schedule.total_interest() - 32_647.0).abs() < 50.0,
            "total interest {}",
            schedule.total_interest()
        );
        assert_eq!(schedule.annual.len(), 20);
        assert_eq!(schedule.annual[19].remaining_balance, 0.0);
    }

    #[test]
    fn test_yearly_payments_reconcile() {
        let schedule = amortize(200_000.0, 3.8, 25, None).unwrap();
        let yearly = schedule.monthly_payment * 12.0;

        for overview in &schedule.annual {
            assert!(
                (overview.payments() - yearly).abs() < 1e-6,
                "year {} paid {}",
                overview.year,
                overview.payments()
            );
        }

        let balances: Vec<f64> = schedule.annual.iter().map(|y| y.remaining_balance).collect();
        assert!(balances.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let schedule = amortize(120_000.0, 0.0, 10, None).unwrap();
        assert_eq!(schedule.monthly_payment, 1_000.0);
        assert_eq!(schedule.total_interest(), 0.0);
        assert!(
            schedule
                .annual
                .iter()
                .all(|y| (y.principal_paid - 12_000.0).abs() < 1e-9)
        );
        assert_eq!(schedule.annual[9].remaining_balance, 0.0);
    }

    #[test]
    fn test_no_principal_no_schedule() {
        let schedule = amortize(0.0, 3.0, 20, None).unwrap();
        assert!(schedule.annual.is_empty());
        assert_eq!(schedule.monthly_payment, 0.0);
        assert_eq!(schedule.balance_after(5), 0.0);
    }

    #[test]
    fn test_zero_term_rejected() {
        assert!(amortize(100_000.0, 3.0, 0, None).is_err());
    }

    #[test]
    fn test_interest_tax_credit_is_capped() {
        let credit = InterestTaxCredit::default();
        let schedule = amortize(300_000.0, 4.0, 30, Some(credit)).unwrap();

        // First year interest is well above 4000: credit capped at 760
        let first = &schedule.annual[0];
        assert!(first.interest_paid > 4_000.0);
        assert!((first.tax_benefit - 760.0).abs() < 1e-9);

        // Late years fall under the cap
        let last = &schedule.annual[29];
        assert!(last.interest_paid < 4_000.0);
        assert!((last.tax_benefit - last.interest_paid * 0.19).abs() < 1e-9);

        let total: f64 = schedule.annual.iter().map(|y| y.tax_benefit).sum();
        assert!((schedule.annual[29].cumulative_tax_benefit - total).abs() < 1e-6);
    }

    #[test]
    fn test_balance_lookup() {
        let schedule = amortize(120_000.0, 2.5, 20, None).unwrap();
        assert!((schedule.balance_after(0) - 120_000.0).abs() < 1e-6);
        assert_eq!(schedule.balance_after(20), 0.0);
        assert_eq!(schedule.balance_after(25), 0.0);
        assert!(schedule.year(21).is_none());
    }

    #[test]
    fn test_opening_costs_and_terms() {
        assert_eq!(opening_costs(200_000.0, DEFAULT_OPENING_COST_PCT), 3_000.0);
        assert_eq!(opening_costs(-5.0, 1.5), 0.0);
        assert!(check_term(25).is_ok());
        assert_eq!(
            check_term(12).unwrap_err(),
            ConfigError::UnsupportedMortgageTerm(12)
        );
    }
}
