//! Engine tests for the fincompare projection engine
//!
//! Tests are organized by topic:
//! - `scenarios` - Reference figures for taxes, tenure rates and mortgages
//! - `housing` - Purchase vs rent runs through the orchestrator
//! - `pension` - Severance destination runs through the orchestrator
//! - `ledger` - Multi-year loss carryforward behavior
//! - `properties` - Property-based invariants (amortization, tax monotonicity)

mod pension;
mod properties;
