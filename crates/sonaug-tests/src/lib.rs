//! Regression harness and shared test utilities for the sonaug pipeline.
//!
//! - [`regression`] - the golden-file protocol (`{"hash": ...}` per
//!   transform name, bootstrap on first run, compare afterwards)
//! - [`fixtures`] - synthesized audio clips, noise beds, impulse
//!   responses, and catalog listings

pub mod fixtures;
pub mod regression;

pub use fixtures::AudioFixture;
pub use regression::{CheckOutcome, GoldenRecord, HarnessError, RegressionSuite};
