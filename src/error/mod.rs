//! Error types for courtside.
//!
//! - **Load errors**: structured failures of the data-fetching callbacks,
//!   stored in resilience state instead of being propagated
//! - **Error values**: what a view holds as its last failure, either a
//!   structured load error or a plain message
//! - **Platform errors**: adapter setup and configuration failures
//!
//! # Example
//!
//! ```ignore
//! use courtside::error::{ErrorValue, LoadError};
//!
//! let err: ErrorValue = LoadError::Timeout {
//!     operation: "schedule fetch".to_string(),
//!     duration_secs: 10,
//! }
//! .into();
//! if err.is_retryable() {
//!     eprintln!("{}", err.user_message());
//! }
//! ```

mod load;
mod platform;
mod value;

pub use load::{classify_reqwest_error, LoadError};
pub use platform::PlatformError;
pub use value::ErrorValue;

/// Result alias for adapter and configuration setup.
pub type PlatformResult<T> = Result<T, PlatformError>;
