//! Shared logging utilities for consistent tracing across the dashboard crates

use chrono::{DateTime, Local};
use tracing::{info, warn};

/// Crates whose events follow the requested level.
const COMPONENT_TARGETS: &[&str] = &["dashboard", "shared"];

/// Build the filter directives for a base level.
///
/// HTTP plumbing is kept at `warn` so request internals do not drown the
/// store's own events.
pub fn filter_directives(base_level: &str) -> String {
    let mut directives: Vec<String> = COMPONENT_TARGETS
        .iter()
        .map(|target| format!("{target}={base_level}"))
        .collect();
    directives.push("reqwest=warn".to_string());
    directives.push("hyper=warn".to_string());
    directives.join(",")
}

/// Initialize tracing with an explicit level (`info` when `None`).
///
/// `RUST_LOG` takes precedence when it is set.
pub fn init_tracing_with_level(log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let base_level = log_level.unwrap_or("info");
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(base_level)));

    // A subscriber may already be installed (tests, embedding front ends).
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

pub fn init_tracing() {
    init_tracing_with_level(None);
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Local> = Local::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Contextual logging helper for failed operations
pub fn log_failure(operation: &str, error: &dyn std::fmt::Display) {
    warn!(
        operation = operation,
        timestamp = format_timestamp(),
        error = %error,
        "{} failed: {}",
        operation,
        error
    );
}

/// Contextual logging helper for completed operations
pub fn log_success(operation: &str, details: &str) {
    info!(
        operation = operation,
        timestamp = format_timestamp(),
        "{}: {}",
        operation,
        details
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives() {
        let directives = filter_directives("debug");
        assert_eq!(directives, "dashboard=debug,shared=debug,reqwest=warn,hyper=warn");
    }

    #[test]
    fn test_init_is_idempotent() {
        init_tracing_with_level(Some("warn"));
        init_tracing();
    }
}
