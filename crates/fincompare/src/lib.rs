//! Command-line front end for the fincompare projection engine
//!
//! Loads a YAML scenario (and optional reference tables), runs a single
//! seeded projection or a Monte Carlo batch, and renders the result as JSON
//! or a text table.

pub mod app;
pub mod logging;
pub mod report;
pub mod scenario;
pub mod util;

#[cfg(test)]
mod tests;

pub use app::{OutputFormat, RunOptions, run};
pub use logging::init_logging;
