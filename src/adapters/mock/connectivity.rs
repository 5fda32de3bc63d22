//! Mock connectivity source for testing.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::traits::ConnectivitySource;

/// Connectivity source whose state is flipped by the test.
///
/// # Example
///
/// ```ignore
/// use courtside::adapters::mock::MockConnectivity;
///
/// let network = MockConnectivity::online();
/// network.go_offline();
/// assert!(!network.is_online());
/// ```
#[derive(Clone)]
pub struct MockConnectivity {
    state_tx: watch::Sender<bool>,
}

impl MockConnectivity {
    /// Create a mock with the given initial state.
    pub fn new(online: bool) -> Self {
        let (state_tx, _) = watch::channel(online);
        Self { state_tx }
    }

    pub fn online() -> Self {
        Self::new(true)
    }

    pub fn offline() -> Self {
        Self::new(false)
    }

    /// Publish a reachability value. Repeats of the current value still
    /// notify, as a platform event would.
    pub fn set_online(&self, online: bool) {
        self.state_tx.send_replace(online);
    }

    pub fn go_offline(&self) {
        self.set_online(false);
    }

    pub fn go_online(&self) {
        self.set_online(true);
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.state_tx.receiver_count()
    }
}

impl Default for MockConnectivity {
    fn default() -> Self {
        Self::online()
    }
}

#[async_trait]
impl ConnectivitySource for MockConnectivity {
    fn is_online(&self) -> bool {
        *self.state_tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.state_tx.subscribe()
    }
}
