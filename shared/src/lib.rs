//! Shared types for the academic records dashboard
//!
//! Record types and wire envelopes for the records API, form validation,
//! and the logging setup used by every front end.

pub mod errors;
pub mod logging;
pub mod types;
pub mod validation;

pub use errors::*;
pub use types::*;
pub use validation::{ExamForm, StudentForm};
