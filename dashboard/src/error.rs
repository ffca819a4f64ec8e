//! Dashboard error types

use thiserror::Error;

/// Result type for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Dashboard error types
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("API request failed with status {status}")]
    Api { status: u16, detail: Option<String> },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl DashboardError {
    /// The server-provided `detail` text, when the failure carried one.
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            DashboardError::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            DashboardError::Decode { message: error.to_string() }
        } else {
            DashboardError::Transport { message: error.to_string() }
        }
    }
}
