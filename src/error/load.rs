//! Load failure types.
//!
//! This module defines the structured errors produced while fetching the data
//! a view renders: schedules, brackets, standings. They are stored in the
//! resilience state rather than propagated, so every variant carries enough
//! information to render a user-facing message.

use serde::Serialize;
use thiserror::Error;

/// Structured failure of a data load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadError {
    /// Connection to the server failed.
    #[error("Connection failed to '{url}': {message}")]
    ConnectionFailed { url: String, message: String },

    /// Request timed out.
    #[error("{operation} timed out after {duration_secs} seconds")]
    Timeout {
        operation: String,
        duration_secs: u64,
    },

    /// HTTP status error (non-2xx response).
    #[error("HTTP {status} error: {message}")]
    HttpStatus { status: u16, message: String },

    /// Rate limited by server.
    #[error("Rate limited")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Response body could not be understood.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// The device reported no network.
    #[error("Device is offline")]
    Offline,

    /// Anything else.
    #[error("Load error: {message}")]
    Other { message: String },
}

impl LoadError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            LoadError::ConnectionFailed { .. } => true,
            LoadError::Timeout { .. } => true,
            LoadError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            LoadError::RateLimited { .. } => true,
            LoadError::InvalidResponse { .. } => false,
            LoadError::Offline => true,
            LoadError::Other { .. } => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            LoadError::ConnectionFailed { .. } => {
                "Unable to reach the league server. Check your connection.".to_string()
            }
            LoadError::Timeout { .. } => {
                "The league server is taking too long to respond.".to_string()
            }
            LoadError::HttpStatus { status, .. } => match *status {
                404 => "This tournament could not be found.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => {
                    "The league server is having trouble. Please try again later.".to_string()
                }
                _ => format!("The server returned an error (HTTP {}).", status),
            },
            LoadError::RateLimited { retry_after_secs } => match retry_after_secs {
                Some(secs) => format!(
                    "Too many requests. Please wait {} seconds before trying again.",
                    secs
                ),
                None => "Too many requests. Please wait a moment and try again.".to_string(),
            },
            LoadError::InvalidResponse { .. } => {
                "Received schedule data this app does not understand.".to_string()
            }
            LoadError::Offline => "You are offline. Showing the last loaded data.".to_string(),
            LoadError::Other { message } => message.clone(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            LoadError::ConnectionFailed { .. } => "E_LOAD_CONN",
            LoadError::Timeout { .. } => "E_LOAD_TIMEOUT",
            LoadError::HttpStatus { .. } => "E_LOAD_HTTP",
            LoadError::RateLimited { .. } => "E_LOAD_RATE",
            LoadError::InvalidResponse { .. } => "E_LOAD_INVALID",
            LoadError::Offline => "E_LOAD_OFFLINE",
            LoadError::Other { .. } => "E_LOAD_OTHER",
        }
    }
}

/// Classify a reqwest error into a [`LoadError`].
pub fn classify_reqwest_error(err: &reqwest::Error, url: &str) -> LoadError {
    if err.is_connect() {
        LoadError::ConnectionFailed {
            url: url.to_string(),
            message: err.to_string(),
        }
    } else if err.is_timeout() {
        LoadError::Timeout {
            operation: "HTTP request".to_string(),
            duration_secs: 10,
        }
    } else if err.is_status() {
        match err.status().map(|s| s.as_u16()) {
            Some(429) => LoadError::RateLimited {
                retry_after_secs: None,
            },
            Some(status) => LoadError::HttpStatus {
                status,
                message: err.to_string(),
            },
            None => LoadError::HttpStatus {
                status: 0,
                message: err.to_string(),
            },
        }
    } else if err.is_decode() {
        LoadError::InvalidResponse {
            message: format!("Failed to decode response: {}", err),
        }
    } else {
        LoadError::Other {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_is_retryable() {
        let err = LoadError::ConnectionFailed {
            url: "https://league.example".to_string(),
            message: "Connection refused".to_string(),
        };
        assert!(err.is_retryable());
        assert_eq!(err.error_code(), "E_LOAD_CONN");
    }

    #[test]
    fn test_http_status_retryable_for_server_errors() {
        for status in [500, 503, 429, 408] {
            let err = LoadError::HttpStatus {
                status,
                message: String::new(),
            };
            assert!(err.is_retryable(), "status {} should be retryable", status);
        }
    }

    #[test]
    fn test_http_status_not_retryable_for_client_errors() {
        for status in [400, 401, 404] {
            let err = LoadError::HttpStatus {
                status,
                message: String::new(),
            };
            assert!(!err.is_retryable(), "status {} should not be retryable", status);
        }
    }

    #[test]
    fn test_display_and_user_message_differ() {
        let err = LoadError::HttpStatus {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503 error: Service Unavailable");
        assert!(err.user_message().contains("trouble"));
    }

    #[test]
    fn test_rate_limited_message_mentions_wait() {
        let err = LoadError::RateLimited {
            retry_after_secs: Some(30),
        };
        assert!(err.user_message().contains("30 seconds"));
        assert_eq!(err.error_code(), "E_LOAD_RATE");
    }

    #[test]
    fn test_other_user_message_is_raw_message() {
        let err = LoadError::Other {
            message: "bracket missing".to_string(),
        };
        assert_eq!(err.user_message(), "bracket missing");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_value(LoadError::Offline).unwrap();
        assert_eq!(json["kind"], "offline");
    }
}
