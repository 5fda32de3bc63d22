//! Mock touch surface and capability check for testing.

use tokio::sync::broadcast;

use crate::traits::{TouchCapability, TouchEvent, TouchPoint, TouchSurface};

/// Touch surface with event injection.
///
/// # Example
///
/// ```ignore
/// use courtside::adapters::mock::MockTouchSurface;
///
/// let surface = MockTouchSurface::new();
/// surface.touch_start(10.0, 10.0);
/// surface.touch_move(10.0, 0.0);
/// surface.touch_end();
/// ```
#[derive(Clone)]
pub struct MockTouchSurface {
    events_tx: broadcast::Sender<TouchEvent>,
}

impl MockTouchSurface {
    pub fn new() -> Self {
        let (events_tx, _) = broadcast::channel(64);
        Self { events_tx }
    }

    /// Inject a raw event.
    pub fn inject(&self, event: TouchEvent) {
        let _ = self.events_tx.send(event);
    }

    pub fn touch_start(&self, x: f64, y: f64) {
        self.inject(TouchEvent::Start(TouchPoint::new(x, y)));
    }

    pub fn touch_move(&self, x: f64, y: f64) {
        self.inject(TouchEvent::Move(TouchPoint::new(x, y)));
    }

    pub fn touch_end(&self) {
        self.inject(TouchEvent::End);
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.events_tx.receiver_count()
    }
}

impl Default for MockTouchSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchSurface for MockTouchSurface {
    fn listen(&self) -> broadcast::Receiver<TouchEvent> {
        self.events_tx.subscribe()
    }
}

/// Capability check returning fixed answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticTouchCapability {
    pub touch_events: bool,
    pub max_touch_points: u32,
}

impl StaticTouchCapability {
    /// A phone or tablet.
    pub fn touchscreen() -> Self {
        Self {
            touch_events: true,
            max_touch_points: 5,
        }
    }

    /// A desktop with a mouse only.
    pub fn pointer_only() -> Self {
        Self::default()
    }
}

impl TouchCapability for StaticTouchCapability {
    fn supports_touch_events(&self) -> bool {
        self.touch_events
    }

    fn max_touch_points(&self) -> u32 {
        self.max_touch_points
    }
}
