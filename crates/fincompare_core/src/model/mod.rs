mod housing;
mod pension;
mod results;

pub use housing::{AnnualOverviewItem, HousingProjection, HousingSummary, InitialCosts, PathYear};
pub use pension::{
    PathSummary, PensionPath, PensionPathYear, PensionProjection, PensionSummary, RetirementYear,
};
pub use results::{MonteCarloSummary, ScenarioResult};
