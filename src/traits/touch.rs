//! Touch input abstractions.
//!
//! Two capabilities live here: a one-shot check answering "is this a touch
//! device", and a surface that delivers touch events to listeners.

use serde::Serialize;
use tokio::sync::broadcast;

/// Position of the primary touch point, in surface coordinates.
///
/// `y` grows downward, as on every screen surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A raw touch event. Only the primary point is carried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    Start(TouchPoint),
    Move(TouchPoint),
    End,
}

/// A surface that emits touch events.
///
/// Listeners are passive: a broadcast receiver can observe events but can
/// never hold up the platform's own handling of them. The returned receiver
/// carries start, move and end events; dropping it removes the listener.
pub trait TouchSurface: Send + Sync {
    fn listen(&self) -> broadcast::Receiver<TouchEvent>;
}

/// Platform touch capability signals.
pub trait TouchCapability: Send + Sync {
    /// Whether the platform exposes touch events at all.
    fn supports_touch_events(&self) -> bool;

    /// Maximum simultaneous touch points the hardware reports.
    fn max_touch_points(&self) -> u32;

    /// Combined verdict: touch events are supported or any touch point exists.
    fn is_touch_capable(&self) -> bool {
        self.supports_touch_events() || self.max_touch_points() > 0
    }
}
