//! Mock viewport for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::traits::Viewport;

/// Viewport whose width is driven by the test.
#[derive(Clone)]
pub struct MockViewport {
    width: Arc<AtomicU32>,
    resize_tx: broadcast::Sender<u32>,
}

impl MockViewport {
    pub fn new(width: u32) -> Self {
        let (resize_tx, _) = broadcast::channel(64);
        Self {
            width: Arc::new(AtomicU32::new(width)),
            resize_tx,
        }
    }

    /// Change the width and notify listeners.
    pub fn resize(&self, width: u32) {
        self.width.store(width, Ordering::SeqCst);
        // No listeners is fine
        let _ = self.resize_tx.send(width);
    }

    /// Number of attached resize listeners.
    pub fn listener_count(&self) -> usize {
        self.resize_tx.receiver_count()
    }
}

impl Viewport for MockViewport {
    fn width(&self) -> u32 {
        self.width.load(Ordering::SeqCst)
    }

    fn on_resize(&self) -> broadcast::Receiver<u32> {
        self.resize_tx.subscribe()
    }
}
