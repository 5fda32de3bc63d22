//! Network reachability abstraction.
//!
//! Provides the online/offline signal a resilience controller mirrors into
//! its state, behind a trait so tests can flip it deterministically.

use async_trait::async_trait;
use tokio::sync::watch;

/// Source of the host's network-reachability signal.
///
/// The watch channel carries `true` while online. Receivers see the current
/// value immediately and are notified on every transition; dropping the
/// receiver unsubscribes.
///
/// # Example
///
/// ```ignore
/// use courtside::traits::ConnectivitySource;
///
/// fn banner<C: ConnectivitySource + ?Sized>(source: &C) -> &'static str {
///     if source.is_online() { "" } else { "Offline" }
/// }
/// ```
#[async_trait]
pub trait ConnectivitySource: Send + Sync {
    /// Current reachability, sampled without waiting.
    fn is_online(&self) -> bool;

    /// Subscribe to online/offline transitions.
    fn subscribe(&self) -> watch::Receiver<bool>;

    /// Re-check reachability now and publish the result.
    ///
    /// Sources without active polling return the last known value.
    async fn recheck(&self) -> bool {
        self.is_online()
    }
}
