//! Client core of the academic records dashboard
//!
//! This library holds the client store that keeps fetched students and exams
//! in sync with the records API, the HTTP implementation of that API, and the
//! pure statistics and list helpers the views are rendered from.

pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod state;
pub mod store_impl;
pub mod traits;
pub mod types;

// Re-export main types
pub use config::DashboardConfig;
pub use error::{DashboardError, DashboardResult};
pub use services::HttpRecordsApi;
pub use store_impl::ClientStore;
pub use traits::*;
pub use types::{StoreSnapshot, StoreState};
