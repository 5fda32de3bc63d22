//! League schedule data and loading.
//!
//! The resilience controller does not know what it is loading. This module
//! is the concrete collaborator the viewer plugs into it: a JSON client, the
//! models it decodes, and a store whose loader doubles as the retry and
//! refresh callback.

pub mod client;
pub mod model;
pub mod store;

pub use client::{ScheduleClient, DEFAULT_REQUEST_TIMEOUT};
pub use model::{Fixture, FixtureStatus, Schedule};
pub use store::{LoadedSchedule, ScheduleStore};
