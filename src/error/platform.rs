//! Errors raised by platform adapters and configuration loading.

use thiserror::Error;

/// Failure setting up or driving a platform signal source.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("HTTP client could not be built: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("missing required setting {0}")]
    MissingSetting(&'static str),

    #[error("invalid value {value:?} for {name}")]
    InvalidSetting { name: &'static str, value: String },
}
