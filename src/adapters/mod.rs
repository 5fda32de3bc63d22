//! Concrete implementations of trait abstractions.
//!
//! This module provides the adapters that feed real platform signals into the
//! traits defined in `crate::traits`.
//!
//! # Adapters
//!
//! - [`HttpConnectivityMonitor`] - reachability from periodic HTTP requests
//! - [`TerminalPlatform`] - viewport, touch surface and touch capability over crossterm
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles for every trait:
//! - [`mock::MockConnectivity`] - flip online/offline on demand
//! - [`mock::MockViewport`] - drive resize notifications
//! - [`mock::MockTouchSurface`] - inject touch events

pub mod http_connectivity;
pub mod mock;
pub mod terminal;

pub use http_connectivity::HttpConnectivityMonitor;
pub use mock::{MockConnectivity, MockTouchSurface, MockViewport, StaticTouchCapability};
pub use terminal::{translate, TerminalInput, TerminalPlatform, DEFAULT_CELL_WIDTH_PX};
