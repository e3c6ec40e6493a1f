//! Front-end tests
//!
//! Topics:
//! - run: scenario files through to rendered reports (single run and batch)

mod run;
