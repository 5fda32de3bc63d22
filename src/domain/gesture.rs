//! Touch gesture recognition.
//!
//! [`GestureState`] turns raw touch samples into a scroll-intent signal:
//! whether a finger is down and which way it last moved. Direction comes from
//! the delta between consecutive samples, not from the start point, so a
//! mid-gesture reversal shows up on the very next move.
//!
//! [`GestureRecognizer`] feeds a `GestureState` from a [`TouchSurface`] and
//! publishes every change through a watch channel.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::traits::{TouchEvent, TouchPoint, TouchSurface};

/// Direction of the most recent touch motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl ScrollDirection {
    pub fn is_horizontal(self) -> bool {
        matches!(self, ScrollDirection::Left | ScrollDirection::Right)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, ScrollDirection::Up | ScrollDirection::Down)
    }

    /// Classify a motion delta. Ties go to the vertical axis, since native
    /// scrolling is vertical. A zero delta has no direction.
    pub fn from_delta(dx: f64, dy: f64) -> Self {
        if dx.abs() > dy.abs() {
            if dx > 0.0 {
                ScrollDirection::Right
            } else {
                ScrollDirection::Left
            }
        } else if dy > 0.0 {
            ScrollDirection::Down
        } else if dy < 0.0 {
            ScrollDirection::Up
        } else {
            ScrollDirection::None
        }
    }
}

/// Scroll intent on one surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GestureState {
    /// A finger is down
    pub is_scrolling: bool,
    /// Direction of the latest move; `None` whenever not scrolling
    pub scroll_direction: ScrollDirection,
    /// Last sampled x position
    pub last_touch_x: f64,
    /// Last sampled y position
    pub last_touch_y: f64,
}

impl GestureState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finger down: remember the point and start scrolling.
    pub fn touch_start(&mut self, point: TouchPoint) {
        self.is_scrolling = true;
        self.scroll_direction = ScrollDirection::None;
        self.last_touch_x = point.x;
        self.last_touch_y = point.y;
    }

    /// Finger moved: classify the delta against the previous sample.
    ///
    /// Moves arriving without a preceding start are ignored. A zero-length
    /// move keeps the current direction.
    pub fn touch_move(&mut self, point: TouchPoint) {
        if !self.is_scrolling {
            return;
        }
        let dx = point.x - self.last_touch_x;
        let dy = point.y - self.last_touch_y;
        let direction = ScrollDirection::from_delta(dx, dy);
        if direction != ScrollDirection::None {
            self.scroll_direction = direction;
        }
        self.last_touch_x = point.x;
        self.last_touch_y = point.y;
    }

    /// Finger up: back to idle.
    pub fn touch_end(&mut self) {
        self.is_scrolling = false;
        self.scroll_direction = ScrollDirection::None;
    }

    pub fn apply(&mut self, event: TouchEvent) {
        match event {
            TouchEvent::Start(point) => self.touch_start(point),
            TouchEvent::Move(point) => self.touch_move(point),
            TouchEvent::End => self.touch_end(),
        }
    }

    /// A horizontal swipe is under way, so custom swipe handling may take
    /// over from native scrolling.
    pub fn is_swiping_horizontally(&self) -> bool {
        self.is_scrolling && self.scroll_direction.is_horizontal()
    }
}

/// Follows one touch surface.
///
/// # Example
///
/// ```ignore
/// use courtside::adapters::mock::MockTouchSurface;
/// use courtside::domain::GestureRecognizer;
///
/// let surface = MockTouchSurface::new();
/// let recognizer = GestureRecognizer::attach(Some(&surface));
/// let mut rx = recognizer.subscribe();
/// ```
pub struct GestureRecognizer {
    state_tx: Arc<watch::Sender<GestureState>>,
    listener: Option<JoinHandle<()>>,
}

impl GestureRecognizer {
    /// Start listening to `surface`. An absent surface (not mounted yet)
    /// yields an idle recognizer.
    ///
    /// Must be called from within a tokio runtime when a surface is given.
    pub fn attach<S: TouchSurface + ?Sized>(surface: Option<&S>) -> Self {
        let (state_tx, _) = watch::channel(GestureState::new());
        let state_tx = Arc::new(state_tx);

        let listener = surface.map(|surface| {
            let events = surface.listen();
            debug!("Gesture recognizer attached");
            tokio::spawn(follow_touches(Arc::clone(&state_tx), events))
        });

        Self { state_tx, listener }
    }

    /// Feed an event delivered by the host directly.
    pub fn handle(&self, event: TouchEvent) {
        self.state_tx.send_if_modified(|state| {
            let before = *state;
            state.apply(event);
            *state != before
        });
    }

    pub fn state(&self) -> GestureState {
        *self.state_tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<GestureState> {
        self.state_tx.subscribe()
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    /// Stop listening. Idempotent.
    pub fn detach(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
            debug!("Gesture recognizer detached");
        }
    }
}

impl Drop for GestureRecognizer {
    fn drop(&mut self) {
        self.detach();
    }
}

async fn follow_touches(
    state_tx: Arc<watch::Sender<GestureState>>,
    mut events: broadcast::Receiver<TouchEvent>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                state_tx.send_if_modified(|state| {
                    let before = *state;
                    state.apply(event);
                    *state != before
                });
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!("Gesture recognizer lagged by {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockTouchSurface;

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_upward_swipe() {
        let mut state = GestureState::new();
        state.touch_start(TouchPoint::new(10.0, 10.0));
        assert!(state.is_scrolling);
        assert_eq!(state.scroll_direction, ScrollDirection::None);

        state.touch_move(TouchPoint::new(10.0, 0.0));
        assert_eq!(state.scroll_direction, ScrollDirection::Up);

        state.touch_end();
        assert!(!state.is_scrolling);
        assert_eq!(state.scroll_direction, ScrollDirection::None);
    }

    #[test]
    fn test_direction_uses_previous_sample() {
        let mut state = GestureState::new();
        state.touch_start(TouchPoint::new(0.0, 100.0));
        state.touch_move(TouchPoint::new(0.0, 150.0));
        assert_eq!(state.scroll_direction, ScrollDirection::Down);

        // Still below the start point, but moving back up
        state.touch_move(TouchPoint::new(0.0, 140.0));
        assert_eq!(state.scroll_direction, ScrollDirection::Up);
        assert_eq!(state.last_touch_y, 140.0);
    }

    #[test]
    fn test_horizontal_dominates_when_larger() {
        let mut state = GestureState::new();
        state.touch_start(TouchPoint::new(50.0, 50.0));
        state.touch_move(TouchPoint::new(80.0, 60.0));
        assert_eq!(state.scroll_direction, ScrollDirection::Right);
        assert!(state.is_swiping_horizontally());

        state.touch_move(TouchPoint::new(40.0, 65.0));
        assert_eq!(state.scroll_direction, ScrollDirection::Left);
    }

    #[test]
    fn test_diagonal_tie_is_vertical() {
        assert_eq!(ScrollDirection::from_delta(5.0, 5.0), ScrollDirection::Down);
        assert_eq!(ScrollDirection::from_delta(-5.0, -5.0), ScrollDirection::Up);
    }

    #[test]
    fn test_tap_without_movement() {
        let mut state = GestureState::new();
        state.touch_start(TouchPoint::new(3.0, 4.0));
        state.touch_end();
        assert_eq!(state.scroll_direction, ScrollDirection::None);
        assert!(!state.is_scrolling);
    }

    #[test]
    fn test_zero_move_keeps_direction() {
        let mut state = GestureState::new();
        state.touch_start(TouchPoint::new(0.0, 0.0));
        state.touch_move(TouchPoint::new(0.0, 20.0));
        state.touch_move(TouchPoint::new(0.0, 20.0));
        assert_eq!(state.scroll_direction, ScrollDirection::Down);
    }

    #[test]
    fn test_move_without_start_is_ignored() {
        let mut state = GestureState::new();
        state.touch_move(TouchPoint::new(10.0, 10.0));
        assert_eq!(state, GestureState::new());
    }

    #[test]
    fn test_absent_surface_is_noop() {
        let recognizer = GestureRecognizer::attach::<MockTouchSurface>(None);
        assert!(!recognizer.is_attached());
        assert_eq!(recognizer.state(), GestureState::new());
    }

    #[tokio::test]
    async fn test_recognizer_follows_surface() {
        let surface = MockTouchSurface::new();
        let recognizer = GestureRecognizer::attach(Some(&surface));

        surface.touch_start(10.0, 10.0);
        surface.touch_move(10.0, 0.0);
        settle().await;
        let state = recognizer.state();
        assert!(state.is_scrolling);
        assert_eq!(state.scroll_direction, ScrollDirection::Up);

        surface.touch_end();
        settle().await;
        let state = recognizer.state();
        assert!(!state.is_scrolling);
        assert_eq!(state.scroll_direction, ScrollDirection::None);
    }

    #[test]
    fn test_handle_drives_state_without_surface() {
        let recognizer = GestureRecognizer::attach::<MockTouchSurface>(None);
        let mut rx = recognizer.subscribe();

        recognizer.handle(TouchEvent::Start(TouchPoint::new(10.0, 10.0)));
        recognizer.handle(TouchEvent::Move(TouchPoint::new(10.0, 0.0)));
        assert!(rx.has_changed().unwrap());
        let state = *rx.borrow_and_update();
        assert!(state.is_scrolling);
        assert_eq!(state.scroll_direction, ScrollDirection::Up);
        assert!(state.scroll_direction.is_vertical());
        assert!(!state.is_swiping_horizontally());

        recognizer.handle(TouchEvent::End);
        let state = *rx.borrow_and_update();
        assert!(!state.is_scrolling);
        assert_eq!(state.scroll_direction, ScrollDirection::None);
        assert!(!state.scroll_direction.is_vertical());
    }

    #[test]
    fn test_handle_unchanged_state_does_not_notify() {
        let recognizer = GestureRecognizer::attach::<MockTouchSurface>(None);
        let rx = recognizer.subscribe();

        // Move without a start leaves the state untouched
        recognizer.handle(TouchEvent::Move(TouchPoint::new(5.0, 5.0)));
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_detach_drops_listener() {
        let surface = MockTouchSurface::new();
        let mut recognizer = GestureRecognizer::attach(Some(&surface));
        assert_eq!(surface.listener_count(), 1);

        recognizer.detach();
        settle().await;
        assert_eq!(surface.listener_count(), 0);

        surface.touch_start(1.0, 1.0);
        settle().await;
        assert!(!recognizer.state().is_scrolling);
    }

    #[tokio::test]
    async fn test_drop_detaches() {
        let surface = MockTouchSurface::new();
        {
            let _recognizer = GestureRecognizer::attach(Some(&surface));
            assert_eq!(surface.listener_count(), 1);
        }
        settle().await;
        assert_eq!(surface.listener_count(), 0);
    }
}
