//! Error types for the dashboard subsystem.

use thiserror::Error;

/// Generic message shown to the user when the dashboard cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Gagal memuatkan data papan pemuka. Sila cuba lagi.";

/// Errors that can occur while fetching or aggregating dashboard data.
#[derive(Debug, Error, Clone)]
pub enum DashboardError {
    /// Network/HTTP request failed
    #[error("Network error: {message}")]
    Network { message: String },

    /// The backend answered with a non-success status
    #[error("Unexpected response from {source_name}: status {status}")]
    UnexpectedResponse { source_name: String, status: u16 },

    /// Response body could not be decoded
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// URL parsing/construction failed
    #[error("URL error: {message}")]
    UrlError { message: String },

    /// A source the dashboard cannot be built without has failed
    #[error("Critical source {source_name} failed: {message}")]
    SourceFailed { source_name: String, message: String },

    /// Configuration could not be loaded
    #[error("Config error: {message}")]
    Config { message: String },
}

impl DashboardError {
    /// The backend source behind this error, if any.
    pub fn source_name(&self) -> Option<&str> {
        match self {
            DashboardError::UnexpectedResponse { source_name, .. }
            | DashboardError::SourceFailed { source_name, .. } => Some(source_name.as_str()),
            _ => None,
        }
    }

    /// The localized message surfaced to the rendering layer.
    pub fn user_message(&self) -> &'static str {
        LOAD_FAILED_MESSAGE
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DashboardError::Decode {
                message: err.to_string(),
            }
        } else {
            DashboardError::Network {
                message: err.to_string(),
            }
        }
    }
}

impl From<url::ParseError> for DashboardError {
    fn from(err: url::ParseError) -> Self {
        DashboardError::UrlError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Decode {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Config {
            message: err.to_string(),
        }
    }
}

/// Per-record problems found while deriving view models.
///
/// These never abort an aggregation; callers substitute a default.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DerivationError {
    #[error("invalid date: {0:?}")]
    InvalidDate(String),

    #[error("invalid time of day: {0:?}")]
    InvalidTime(String),

    #[error("invalid sessions field: {0}")]
    InvalidSessions(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_name() {
        let critical = DashboardError::SourceFailed {
            source_name: "students".to_string(),
            message: "boom".to_string(),
        };
        let network = DashboardError::Network {
            message: "timeout".to_string(),
        };

        assert_eq!(critical.source_name(), Some("students"));
        assert_eq!(network.source_name(), None);
        assert_eq!(critical.user_message(), LOAD_FAILED_MESSAGE);
    }
}
