//! Trait abstractions for platform signals.
//!
//! The controller, recognizer and classifier never reach for global platform
//! APIs. They depend on these traits, which the adapters implement for real
//! platforms and the mocks implement for tests.
//!
//! # Traits
//!
//! - [`ConnectivitySource`] - online/offline signal
//! - [`TouchCapability`] - touch capability detection
//! - [`TouchSurface`] - touch start/move/end events on one surface
//! - [`Viewport`] - current width and resize notifications

pub mod connectivity;
pub mod touch;
pub mod viewport;

pub use connectivity::ConnectivitySource;
pub use touch::{TouchCapability, TouchEvent, TouchPoint, TouchSurface};
pub use viewport::Viewport;
