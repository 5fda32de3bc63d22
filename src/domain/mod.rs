//! Domain objects for view resilience and device adaptation.
//!
//! The three units here are independent of each other and of any rendering
//! code. Each owns its state, publishes it through a watch channel and tears
//! its listeners down when dropped.
//!
//! ## Domain Objects
//!
//! - [`ResilienceController`] - loading, error, retry and refresh lifecycle
//! - [`GestureRecognizer`] - scroll intent from touch motion
//! - [`BreakpointClassifier`] - responsive tier from viewport width

pub mod breakpoint;
pub mod gesture;
pub mod resilience;

pub use breakpoint::{breakpoints, Breakpoint, BreakpointClassifier, BreakpointState};
pub use gesture::{GestureRecognizer, GestureState, ScrollDirection};
pub use resilience::{
    backoff_delay, PendingRetry, RefreshOutcome, Reload, ResilienceActions, ResilienceConfig,
    ResilienceController, ResilienceState, RetryOutcome, DEFAULT_MAX_RETRIES,
    DEFAULT_RETRY_DELAY, RETRY_EXHAUSTED_MESSAGE,
};
