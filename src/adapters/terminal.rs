//! Terminal-backed platform signals.
//!
//! Maps crossterm events onto the platform traits:
//! - resize events become viewport widths (`columns * cell width`)
//! - left-button press, drag and release become touch start, move and end
//! - key presses are forwarded to the application on their own channel
//!
//! A terminal is never a touch device, so the capability check always answers no.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crossterm::event::{
    Event, EventStream, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use futures::StreamExt;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::PlatformResult;
use crate::traits::{TouchCapability, TouchEvent, TouchPoint, TouchSurface, Viewport};

/// Assumed width of one terminal cell in logical pixels.
pub const DEFAULT_CELL_WIDTH_PX: u32 = 8;

const CHANNEL_CAPACITY: usize = 64;

/// What a single terminal event means to the platform traits.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalInput {
    Resize(u32),
    Touch(TouchEvent),
    Key(KeyEvent),
    Ignored,
}

/// Classify a crossterm event.
///
/// Cells are treated as twice as tall as they are wide.
pub fn translate(event: &Event, cell_width_px: u32) -> TerminalInput {
    match event {
        Event::Resize(columns, _) => TerminalInput::Resize(u32::from(*columns) * cell_width_px),
        Event::Mouse(mouse) => translate_mouse(mouse, cell_width_px),
        Event::Key(key) if key.kind == KeyEventKind::Press => TerminalInput::Key(*key),
        _ => TerminalInput::Ignored,
    }
}

fn translate_mouse(mouse: &MouseEvent, cell_width_px: u32) -> TerminalInput {
    let point = TouchPoint::new(
        f64::from(mouse.column) * f64::from(cell_width_px),
        f64::from(mouse.row) * f64::from(cell_width_px * 2),
    );
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => TerminalInput::Touch(TouchEvent::Start(point)),
        MouseEventKind::Drag(MouseButton::Left) => TerminalInput::Touch(TouchEvent::Move(point)),
        MouseEventKind::Up(MouseButton::Left) => TerminalInput::Touch(TouchEvent::End),
        _ => TerminalInput::Ignored,
    }
}

#[derive(Clone)]
struct Channels {
    cell_width_px: u32,
    width: Arc<AtomicU32>,
    resize_tx: broadcast::Sender<u32>,
    touch_tx: broadcast::Sender<TouchEvent>,
}

impl Channels {
    /// Publish viewport and touch events; hand keys back to the caller.
    fn dispatch(&self, event: &Event) -> Option<KeyEvent> {
        match translate(event, self.cell_width_px) {
            TerminalInput::Resize(width) => {
                self.width.store(width, Ordering::SeqCst);
                let _ = self.resize_tx.send(width);
                None
            }
            TerminalInput::Touch(touch) => {
                let _ = self.touch_tx.send(touch);
                None
            }
            TerminalInput::Key(key) => Some(key),
            TerminalInput::Ignored => None,
        }
    }
}

/// Viewport, touch surface and touch capability for a crossterm terminal.
pub struct TerminalPlatform {
    channels: Channels,
    pump: Option<JoinHandle<()>>,
}

impl TerminalPlatform {
    /// Create a platform for a terminal `columns` wide without reading events.
    pub fn new(columns: u16, cell_width_px: u32) -> Self {
        let (resize_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (touch_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            channels: Channels {
                cell_width_px,
                width: Arc::new(AtomicU32::new(u32::from(columns) * cell_width_px)),
                resize_tx,
                touch_tx,
            },
            pump: None,
        }
    }

    /// Create a platform sized to the current terminal.
    pub fn from_terminal(cell_width_px: u32) -> PlatformResult<Self> {
        let (columns, _) = crossterm::terminal::size()?;
        Ok(Self::new(columns, cell_width_px))
    }

    /// Start reading terminal events and return the key press stream.
    ///
    /// The pump stops when the terminal event stream fails or the key
    /// receiver is dropped. Must be called from within a Tokio runtime.
    pub fn start(&mut self) -> mpsc::UnboundedReceiver<KeyEvent> {
        self.stop();
        let (key_tx, key_rx) = mpsc::unbounded_channel();
        let channels = self.channels.clone();
        self.pump = Some(tokio::spawn(async move {
            let mut events = EventStream::new();
            while let Some(next) = events.next().await {
                match next {
                    Ok(event) => {
                        if let Some(key) = channels.dispatch(&event) {
                            if key_tx.send(key).is_err() {
                                debug!("Key receiver dropped, stopping terminal pump");
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        warn!("Terminal event stream failed: {}", e);
                        break;
                    }
                }
            }
        }));
        key_rx
    }

    pub fn stop(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }

    /// Feed one event through the same path the pump uses.
    pub fn dispatch(&self, event: &Event) -> Option<KeyEvent> {
        self.channels.dispatch(event)
    }
}

impl Drop for TerminalPlatform {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Viewport for TerminalPlatform {
    fn width(&self) -> u32 {
        self.channels.width.load(Ordering::SeqCst)
    }

    fn on_resize(&self) -> broadcast::Receiver<u32> {
        self.channels.resize_tx.subscribe()
    }
}

impl TouchSurface for TerminalPlatform {
    fn listen(&self) -> broadcast::Receiver<TouchEvent> {
        self.channels.touch_tx.subscribe()
    }
}

impl TouchCapability for TerminalPlatform {
    fn supports_touch_events(&self) -> bool {
        false
    }

    fn max_touch_points(&self) -> u32 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_translate_resize_uses_cell_width() {
        assert_eq!(
            translate(&Event::Resize(100, 40), 8),
            TerminalInput::Resize(800)
        );
    }

    #[test]
    fn test_translate_left_button_as_touch() {
        assert_eq!(
            translate(&mouse(MouseEventKind::Down(MouseButton::Left), 2, 3), 8),
            TerminalInput::Touch(TouchEvent::Start(TouchPoint::new(16.0, 48.0)))
        );
        assert_eq!(
            translate(&mouse(MouseEventKind::Drag(MouseButton::Left), 2, 1), 8),
            TerminalInput::Touch(TouchEvent::Move(TouchPoint::new(16.0, 16.0)))
        );
        assert_eq!(
            translate(&mouse(MouseEventKind::Up(MouseButton::Left), 2, 1), 8),
            TerminalInput::Touch(TouchEvent::End)
        );
    }

    #[test]
    fn test_translate_ignores_other_buttons_and_releases() {
        assert_eq!(
            translate(&mouse(MouseEventKind::Down(MouseButton::Right), 0, 0), 8),
            TerminalInput::Ignored
        );
        assert_eq!(
            translate(&mouse(MouseEventKind::ScrollDown, 0, 0), 8),
            TerminalInput::Ignored
        );

        let mut release = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(translate(&Event::Key(release), 8), TerminalInput::Ignored);
    }

    #[test]
    fn test_dispatch_updates_width_and_notifies() {
        let platform = TerminalPlatform::new(80, 8);
        assert_eq!(platform.width(), 640);

        let mut resizes = platform.on_resize();
        assert!(platform.dispatch(&Event::Resize(50, 20)).is_none());
        assert_eq!(platform.width(), 400);
        assert_eq!(resizes.try_recv().unwrap(), 400);
    }

    #[test]
    fn test_dispatch_forwards_touch_and_returns_keys() {
        let platform = TerminalPlatform::new(80, 8);
        let mut touches = platform.listen();

        platform.dispatch(&mouse(MouseEventKind::Down(MouseButton::Left), 1, 1));
        assert!(matches!(touches.try_recv().unwrap(), TouchEvent::Start(_)));

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(platform.dispatch(&Event::Key(key)), Some(key));
    }

    #[test]
    fn test_terminal_is_not_touch_capable() {
        let platform = TerminalPlatform::new(80, 8);
        assert!(!platform.is_touch_capable());
    }
}
