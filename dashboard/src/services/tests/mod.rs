//! Tests for dashboard services
//!
//! The HTTP client is exercised against a local mock server; the store is
//! driven through a mocked `RecordsApi`.

pub mod fixtures;
