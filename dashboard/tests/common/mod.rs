//! Common test utilities for the dashboard test suites

pub mod fixtures;
pub mod helpers;

pub use fixtures::TestFixtures;
pub use helpers::{GatedRecordsApi, TestHelpers};
