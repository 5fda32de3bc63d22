//! Responsive breakpoint classification.
//!
//! Maps a viewport width to one of five ordinal tiers and keeps the tier
//! current as the viewport resizes. Layout code picks variants from the tier
//! (or the mobile/tablet/desktop flags) instead of comparing raw widths.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::traits::Viewport;

// ============================================================================
// Width Breakpoints
// ============================================================================

/// Minimum widths (logical pixels) at which each tier starts.
pub mod breakpoints {
    /// Small starts at 480
    pub const SM_WIDTH: u32 = 480;
    /// Medium starts at 640
    pub const MD_WIDTH: u32 = 640;
    /// Large starts at 768
    pub const LG_WIDTH: u32 = 768;
    /// Extra large starts at 1024
    pub const XL_WIDTH: u32 = 1024;
}

/// Responsive tier, ordered from narrowest to widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    /// Below 480
    Xs,
    /// 480 to 639
    Sm,
    /// 640 to 767
    Md,
    /// 768 to 1023
    Lg,
    /// 1024 and above
    Xl,
}

impl Breakpoint {
    /// Classify a width. Intervals are half-open: a boundary width belongs
    /// to the wider tier.
    pub fn from_width(width: u32) -> Self {
        if width < breakpoints::SM_WIDTH {
            Breakpoint::Xs
        } else if width < breakpoints::MD_WIDTH {
            Breakpoint::Sm
        } else if width < breakpoints::LG_WIDTH {
            Breakpoint::Md
        } else if width < breakpoints::XL_WIDTH {
            Breakpoint::Lg
        } else {
            Breakpoint::Xl
        }
    }

    pub fn is_mobile(self) -> bool {
        matches!(self, Breakpoint::Xs | Breakpoint::Sm)
    }

    pub fn is_tablet(self) -> bool {
        self == Breakpoint::Md
    }

    pub fn is_desktop(self) -> bool {
        matches!(self, Breakpoint::Lg | Breakpoint::Xl)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Breakpoint::Xs => "xs",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
        }
    }
}

impl std::fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current tier plus its derived device-class flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreakpointState {
    pub breakpoint: Breakpoint,
    pub is_mobile: bool,
    pub is_tablet: bool,
    pub is_desktop: bool,
}

impl BreakpointState {
    pub fn from_width(width: u32) -> Self {
        let breakpoint = Breakpoint::from_width(width);
        Self {
            breakpoint,
            is_mobile: breakpoint.is_mobile(),
            is_tablet: breakpoint.is_tablet(),
            is_desktop: breakpoint.is_desktop(),
        }
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Keeps a [`BreakpointState`] in step with a viewport.
///
/// # Example
///
/// ```ignore
/// use courtside::adapters::mock::MockViewport;
/// use courtside::domain::{Breakpoint, BreakpointClassifier};
///
/// let viewport = MockViewport::new(375);
/// let classifier = BreakpointClassifier::observe(&viewport);
/// assert_eq!(classifier.breakpoint(), Breakpoint::Xs);
/// ```
pub struct BreakpointClassifier {
    state_tx: Arc<watch::Sender<BreakpointState>>,
    listener: Option<JoinHandle<()>>,
}

impl BreakpointClassifier {
    /// Classify the current width and follow resize notifications.
    ///
    /// Must be called from within a tokio runtime.
    pub fn observe<V: Viewport + ?Sized>(viewport: &V) -> Self {
        let resize_rx = viewport.on_resize();
        let (state_tx, _) = watch::channel(BreakpointState::from_width(viewport.width()));
        let state_tx = Arc::new(state_tx);
        let listener = tokio::spawn(follow_resizes(Arc::clone(&state_tx), resize_rx));

        Self {
            state_tx,
            listener: Some(listener),
        }
    }

    /// Classify a fixed width without listening to anything.
    pub fn fixed(width: u32) -> Self {
        let (state_tx, _) = watch::channel(BreakpointState::from_width(width));
        Self {
            state_tx: Arc::new(state_tx),
            listener: None,
        }
    }

    /// Recompute from a width delivered by the host. Subscribers are only
    /// notified when the tier changes.
    pub fn apply_width(&self, width: u32) {
        apply(&self.state_tx, width);
    }

    pub fn state(&self) -> BreakpointState {
        *self.state_tx.borrow()
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.state().breakpoint
    }

    pub fn subscribe(&self) -> watch::Receiver<BreakpointState> {
        self.state_tx.subscribe()
    }

    /// Stop following the viewport. Idempotent.
    pub fn detach(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
            debug!("Breakpoint classifier detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }
}

impl Drop for BreakpointClassifier {
    fn drop(&mut self) {
        self.detach();
    }
}

fn apply(state_tx: &watch::Sender<BreakpointState>, width: u32) {
    let next = BreakpointState::from_width(width);
    let changed = state_tx.send_if_modified(|state| {
        let changed = *state != next;
        *state = next;
        changed
    });
    if changed {
        debug!("Breakpoint changed to {} at width {}", next.breakpoint, width);
    }
}

async fn follow_resizes(
    state_tx: Arc<watch::Sender<BreakpointState>>,
    mut resize_rx: broadcast::Receiver<u32>,
) {
    loop {
        match resize_rx.recv().await {
            Ok(width) => apply(&state_tx, width),
            // Older widths were dropped; newer ones are still queued
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!("Skipped {} resize notifications", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
