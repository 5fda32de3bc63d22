//! Courtside - a connection-resilient tournament schedule viewer
//!
//! The library holds the view-resilience layer and everything the terminal
//! viewer builds on it. It is exposed for integration tests and for embedding
//! the controller in other front ends.
//!
//! - [`domain`] - resilience controller, gesture recognizer, breakpoint classifier
//! - [`traits`] / [`adapters`] - platform signals and their implementations
//! - [`schedule`] - league schedule models, client and store
//! - [`view`] - pure ratatui rendering of the schedule screen

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod schedule;
pub mod terminal;
pub mod traits;
pub mod view;
