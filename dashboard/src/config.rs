//! Dashboard configuration
//!
//! Values are read from the environment after loading a `.env` file from the
//! current directory or one of its parents, if present. Environment variables
//! take precedence over `.env` values; command line flags override both.
//!
//! - `DASHBOARD_API_URL`: records API base URL (default `http://localhost:8000/api`)
//! - `DASHBOARD_TIMEOUT_MS`: per-request timeout in milliseconds (default 30000)
//! - `DASHBOARD_LOG_LEVEL`: tracing level for the dashboard crates (default `info`)

use std::time::Duration;
use url::Url;

use crate::error::{DashboardError, DashboardResult};

pub const API_URL_VAR: &str = "DASHBOARD_API_URL";
pub const TIMEOUT_VAR: &str = "DASHBOARD_TIMEOUT_MS";
pub const LOG_LEVEL_VAR: &str = "DASHBOARD_LOG_LEVEL";

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_base_url: Url,
    pub request_timeout: Duration,
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> DashboardResult<Self> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> DashboardResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_VAR) {
            config.api_base_url = parse_base_url(&url)?;
        }
        if let Some(timeout) = lookup(TIMEOUT_VAR) {
            config.request_timeout = parse_timeout_ms(&timeout)?;
        }
        if let Some(level) = lookup(LOG_LEVEL_VAR) {
            if !level.trim().is_empty() {
                config.log_level = level.trim().to_string();
            }
        }

        Ok(config)
    }

    pub fn with_api_url(mut self, url: &str) -> DashboardResult<Self> {
        self.api_base_url = parse_base_url(url)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

/// Parse a base URL, normalising it to end with `/` so relative endpoint
/// paths join beneath it instead of replacing its last segment.
pub fn parse_base_url(raw: &str) -> DashboardResult<Url> {
    let trimmed = raw.trim();
    let normalised = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&normalised).map_err(|e| DashboardError::Config {
        message: format!("Invalid API URL '{trimmed}': {e}"),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(DashboardError::Config {
            message: format!("API URL must be an http(s) URL: {trimmed}"),
        });
    }
    Ok(url)
}

fn parse_timeout_ms(raw: &str) -> DashboardResult<Duration> {
    let millis: u64 = raw.trim().parse().map_err(|_| DashboardError::Config {
        message: format!("{TIMEOUT_VAR} must be a number of milliseconds, got '{raw}'"),
    })?;
    if millis == 0 {
        return Err(DashboardError::Config {
            message: format!("{TIMEOUT_VAR} must be greater than zero"),
        });
    }
    Ok(Duration::from_millis(millis))
}
