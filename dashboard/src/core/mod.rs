//! Dashboard core logic
//!
//! Pure functions only; nothing in here performs I/O or touches store state.

pub mod roster;
pub mod stats;

pub use roster::{filter_students, initials, paginate, Page};
pub use stats::{ExamCharts, ExamStats, PassStatus, ScoreBand};
