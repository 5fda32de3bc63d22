//! Mock implementations for testing.
//!
//! Every platform trait has a test double here, so controller, recognizer and
//! classifier tests run without a terminal or a network.
//!
//! # Available Mocks
//!
//! - [`MockConnectivity`] - flip online/offline on demand
//! - [`MockViewport`] - drive resize notifications
//! - [`MockTouchSurface`] - inject touch events
//! - [`StaticTouchCapability`] - fixed touch capability answers

pub mod connectivity;
pub mod touch;
pub mod viewport;

pub use connectivity::MockConnectivity;
pub use touch::{MockTouchSurface, StaticTouchCapability};
pub use viewport::MockViewport;
