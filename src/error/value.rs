//! The error value held by resilience state.

use std::fmt;

use serde::Serialize;

use super::load::LoadError;

/// Last unrecovered failure of a view.
///
/// Callbacks may fail with a structured [`LoadError`] or with a plain
/// message; both end up here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorValue {
    Structured(LoadError),
    Message(String),
}

impl ErrorValue {
    /// Text suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ErrorValue::Structured(err) => err.user_message(),
            ErrorValue::Message(msg) => msg.clone(),
        }
    }

    /// Whether another attempt is worth making.
    ///
    /// Plain messages carry no classification and are treated as retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ErrorValue::Structured(err) => err.is_retryable(),
            ErrorValue::Message(_) => true,
        }
    }

    pub fn as_load_error(&self) -> Option<&LoadError> {
        match self {
            ErrorValue::Structured(err) => Some(err),
            ErrorValue::Message(_) => None,
        }
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorValue::Structured(err) => write!(f, "{}", err),
            ErrorValue::Message(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ErrorValue {}

impl From<LoadError> for ErrorValue {
    fn from(err: LoadError) -> Self {
        ErrorValue::Structured(err)
    }
}

impl From<String> for ErrorValue {
    fn from(msg: String) -> Self {
        ErrorValue::Message(msg)
    }
}

impl From<&str> for ErrorValue {
    fn from(msg: &str) -> Self {
        ErrorValue::Message(msg.to_string())
    }
}
