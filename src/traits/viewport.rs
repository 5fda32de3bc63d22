//! Viewport size abstraction.

use tokio::sync::broadcast;

/// A viewport whose width drives responsive layout.
///
/// Widths are logical pixels. Every resize is delivered to each receiver in
/// order; dropping the receiver removes the listener.
pub trait Viewport: Send + Sync {
    /// Current width.
    fn width(&self) -> u32;

    /// Subscribe to resize notifications carrying the new width.
    fn on_resize(&self) -> broadcast::Receiver<u32>;
}
