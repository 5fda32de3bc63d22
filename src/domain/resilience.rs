//! Load/error/retry/refresh lifecycle for one view.
//!
//! [`ResilienceController`] is mounted once per view and owns that view's
//! [`ResilienceState`]. Presentation code reads the state through a watch
//! channel and drives it through [`ResilienceActions`], a cheap handle whose
//! identity stays fixed for the controller's lifetime.
//!
//! Retries back off exponentially: attempt `k` runs the retry callback
//! `retry_delay × 2^(k-1)` after `retry()` was called. Once `max_retries`
//! attempts have been spent, `retry()` stores a terminal message instead of
//! scheduling anything. Refreshes run immediately and are never limited.
//!
//! Callback failures, panics included, are caught and stored as the view's
//! error. Nothing escapes the controller.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::ErrorValue;
use crate::traits::{ConnectivitySource, TouchCapability};

/// Default number of retries before the terminal failure.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Error stored once the retry budget is spent.
pub const RETRY_EXHAUSTED_MESSAGE: &str = "Maximum retry attempts reached. Please try again later.";

/// Roughly 30 years; stands in for a deadline that cannot be represented.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

const ENV_MAX_RETRIES: &str = "COURTSIDE_MAX_RETRIES";
const ENV_RETRY_DELAY_MS: &str = "COURTSIDE_RETRY_DELAY_MS";

// ============================================================================
// Callbacks
// ============================================================================

/// An async reload operation supplied by the caller.
///
/// Used for both the retry and the refresh callback. Implement it directly
/// for loader types, or pass a closure to the config builder.
#[async_trait]
pub trait Reload: Send + Sync {
    async fn reload(&self) -> Result<(), ErrorValue>;
}

struct FnReload<F>(F);

#[async_trait]
impl<F, Fut, E> Reload for FnReload<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<ErrorValue> + Send + 'static,
{
    async fn reload(&self) -> Result<(), ErrorValue> {
        (self.0)().await.map_err(Into::into)
    }
}

/// Run a callback, turning panics into error values.
async fn invoke(action: Arc<dyn Reload>) -> Result<(), ErrorValue> {
    match AssertUnwindSafe(action.reload()).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(ErrorValue::Message(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("Load callback panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("Load callback panicked: {}", msg)
    } else {
        "Load callback panicked".to_string()
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for a [`ResilienceController`].
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use courtside::domain::ResilienceConfig;
///
/// let config = ResilienceConfig::new()
///     .with_max_retries(5)
///     .with_retry_delay(Duration::from_millis(250))
///     .with_on_refresh(|| async { Ok::<(), String>(()) });
/// ```
#[derive(Clone)]
pub struct ResilienceConfig {
    /// Attempts allowed before `retry()` reports a terminal failure
    pub max_retries: u32,
    /// Delay before the first retry; doubles with each further attempt
    pub retry_delay: Duration,
    on_retry: Option<Arc<dyn Reload>>,
    on_refresh: Option<Arc<dyn Reload>>,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            on_retry: None,
            on_refresh: None,
        }
    }
}

impl std::fmt::Debug for ResilienceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilienceConfig")
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .field("on_retry", &self.on_retry.is_some())
            .field("on_refresh", &self.on_refresh.is_some())
            .finish()
    }
}

impl ResilienceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Set the retry callback from a closure returning a future.
    pub fn with_on_retry<F, Fut, E>(self, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<ErrorValue> + Send + 'static,
    {
        self.with_retry_action(Arc::new(FnReload(f)))
    }

    /// Set the refresh callback from a closure returning a future.
    pub fn with_on_refresh<F, Fut, E>(self, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<ErrorValue> + Send + 'static,
    {
        self.with_refresh_action(Arc::new(FnReload(f)))
    }

    pub fn with_retry_action(mut self, action: Arc<dyn Reload>) -> Self {
        self.on_retry = Some(action);
        self
    }

    pub fn with_refresh_action(mut self, action: Arc<dyn Reload>) -> Self {
        self.on_refresh = Some(action);
        self
    }

    pub fn has_on_retry(&self) -> bool {
        self.on_retry.is_some()
    }

    pub fn has_on_refresh(&self) -> bool {
        self.on_refresh.is_some()
    }

    /// Defaults overridden by `COURTSIDE_MAX_RETRIES` and
    /// `COURTSIDE_RETRY_DELAY_MS`.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment overrides to this config.
    ///
    /// Unparseable values are logged and ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(max_retries) = env_number(ENV_MAX_RETRIES) {
            self.max_retries = max_retries as u32;
        }
        if let Some(delay_ms) = env_number(ENV_RETRY_DELAY_MS) {
            self.retry_delay = Duration::from_millis(delay_ms);
        }
        self
    }
}

fn env_number(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(value) if value <= u32::MAX as u64 => Some(value),
        _ => {
            warn!("Ignoring invalid {}={:?}", name, raw);
            None
        }
    }
}

/// Delay before retry attempt `attempt` (1-based).
///
/// `base × 2^(attempt-1)`, saturating instead of overflowing.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 1u32
        .checked_shl(attempt.saturating_sub(1))
        .unwrap_or(u32::MAX);
    base.saturating_mul(factor)
}

/// `now + delay`, clamped to a far-future instant when the sum overflows.
fn retry_deadline(now: Instant, delay: Duration) -> Instant {
    now.checked_add(delay)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

// ============================================================================
// State
// ============================================================================

/// Lifecycle state of one view's data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResilienceState {
    /// Initial load or retry attempt in flight
    pub is_loading: bool,
    /// Last unrecovered failure
    pub error: Option<ErrorValue>,
    /// User-triggered refresh in flight
    pub is_refreshing: bool,
    /// Retry attempts since the error last cleared
    pub retry_count: u32,
    /// Mirrors the platform reachability signal
    pub is_online: bool,
    /// Sampled once at mount
    pub is_touch_device: bool,
    /// Set when `retry()` stored the terminal failure; any other error
    /// outcome clears it
    pub retries_exhausted: bool,
}

impl ResilienceState {
    fn initial(is_online: bool, is_touch_device: bool) -> Self {
        Self {
            is_loading: false,
            error: None,
            is_refreshing: false,
            retry_count: 0,
            is_online,
            is_touch_device,
            retries_exhausted: false,
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Whether the stored error is the terminal retry-exhausted failure.
    ///
    /// A callback error that happens to carry the same text does not count.
    pub fn is_retry_exhausted(&self) -> bool {
        self.retries_exhausted && self.error.is_some()
    }

    /// Whether any operation is in flight.
    pub fn is_busy(&self) -> bool {
        self.is_loading || self.is_refreshing
    }
}

/// A retry whose timer is armed or whose callback is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRetry {
    /// 1-based attempt number
    pub attempt: u32,
    /// Backoff applied to this attempt
    pub delay: Duration,
    /// When the callback fires
    pub deadline: Instant,
}

/// What a call to `retry()` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// Callback scheduled after `delay`
    Scheduled { attempt: u32, delay: Duration },
    /// Budget spent; terminal error stored
    Exhausted,
    /// Controller already torn down; nothing changed
    Detached,
}

/// What a call to `refresh()` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    Failed(ErrorValue),
    /// No refresh callback configured
    NotConfigured,
    /// Controller torn down before or during the refresh
    Detached,
}

// ============================================================================
// Shared core
// ============================================================================

struct RetryTask {
    generation: u64,
    info: PendingRetry,
    handle: JoinHandle<()>,
}

struct Shared {
    max_retries: u32,
    retry_delay: Duration,
    on_retry: Option<Arc<dyn Reload>>,
    on_refresh: Option<Arc<dyn Reload>>,
    state_tx: watch::Sender<ResilienceState>,
    pending: Mutex<Option<RetryTask>>,
    next_generation: AtomicU64,
    torn_down: AtomicBool,
    runtime: Handle,
}

impl Shared {
    fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<RetryTask>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a mutation unless torn down. Subscribers are notified only when
    /// `f` reports a change.
    fn mutate(&self, f: impl FnOnce(&mut ResilienceState) -> bool) -> bool {
        if self.is_torn_down() {
            return false;
        }
        self.state_tx.send_if_modified(f)
    }

    fn cancel_pending(&self) {
        if let Some(task) = self.lock_pending().take() {
            debug!("Cancelling pending retry attempt {}", task.info.attempt);
            task.handle.abort();
        }
    }

    /// Called by the retry task once its callback settles.
    fn finish_retry(&self, generation: u64, result: Result<(), ErrorValue>) {
        {
            let mut pending = self.lock_pending();
            match pending.as_ref() {
                Some(task) if task.generation == generation => {
                    pending.take();
                }
                // Superseded by a newer retry or cancelled
                _ => return,
            }
        }

        match result {
            Ok(()) => {
                info!("Retry succeeded, clearing error");
                self.mutate(|s| {
                    s.error = None;
                    s.retries_exhausted = false;
                    s.retry_count = 0;
                    s.is_loading = false;
                    true
                });
            }
            Err(err) => {
                warn!("Retry failed: {}", err);
                self.mutate(|s| {
                    s.error = Some(err);
                    s.retries_exhausted = false;
                    s.is_loading = false;
                    true
                });
            }
        }
    }
}

async fn run_retry(shared: Arc<Shared>, generation: u64, deadline: Instant) {
    tokio::time::sleep_until(deadline).await;

    let result = match shared.on_retry.clone() {
        Some(action) => invoke(action).await,
        None => Ok(()),
    };
    shared.finish_retry(generation, result);
}

async fn mirror_connectivity(shared: Arc<Shared>, mut online_rx: watch::Receiver<bool>) {
    while online_rx.changed().await.is_ok() {
        let online = *online_rx.borrow_and_update();
        let changed = shared.mutate(|s| {
            let changed = s.is_online != online;
            s.is_online = online;
            changed
        });
        if changed {
            info!("Connectivity changed: {}", if online { "online" } else { "offline" });
        }
    }
    debug!("Connectivity source closed");
}

// ============================================================================
// Public handles
// ============================================================================

/// Imperative actions on a view's resilience state.
///
/// Clones share the same controller; [`ResilienceActions::ptr_eq`] tells
/// whether two handles belong to the same one. After the controller is torn
/// down every action is a no-op.
#[derive(Clone)]
pub struct ResilienceActions {
    shared: Arc<Shared>,
}

impl ResilienceActions {
    /// Set `is_loading`; nothing else changes.
    pub fn set_loading(&self, loading: bool) {
        self.shared.mutate(|s| {
            let changed = s.is_loading != loading;
            s.is_loading = loading;
            changed
        });
    }

    /// Store an error and stop loading. `retry_count` is left alone.
    pub fn set_error(&self, error: impl Into<ErrorValue>) {
        let error = error.into();
        debug!("Error set: {}", error);
        self.shared.mutate(|s| {
            s.error = Some(error);
            s.retries_exhausted = false;
            s.is_loading = false;
            true
        });
    }

    /// Clear the error and reset the retry budget.
    pub fn clear_error(&self) {
        self.shared.mutate(|s| {
            let changed = s.error.is_some() || s.retry_count != 0;
            s.error = None;
            s.retries_exhausted = false;
            s.retry_count = 0;
            changed
        });
    }

    /// Schedule another attempt with exponential backoff.
    ///
    /// A retry issued while another is still pending replaces it: the older
    /// timer is cancelled and only the newest attempt's callback runs.
    pub fn retry(&self) -> RetryOutcome {
        let shared = &self.shared;
        if shared.is_torn_down() {
            debug!("retry() after teardown ignored");
            return RetryOutcome::Detached;
        }

        let current = shared.state_tx.borrow().retry_count;
        if current >= shared.max_retries {
            shared.cancel_pending();
            warn!(
                "Retry limit reached after {} attempts, giving up",
                current
            );
            shared.mutate(|s| {
                s.error = Some(ErrorValue::Message(RETRY_EXHAUSTED_MESSAGE.to_string()));
                s.retries_exhausted = true;
                s.is_loading = false;
                true
            });
            return RetryOutcome::Exhausted;
        }

        let attempt = current + 1;
        let delay = backoff_delay(shared.retry_delay, attempt);
        let deadline = retry_deadline(Instant::now(), delay);
        shared.mutate(|s| {
            s.retry_count = attempt;
            s.is_loading = true;
            true
        });

        // Hold the slot while spawning so the task cannot finish before it
        // is registered.
        let mut pending = shared.lock_pending();
        let generation = shared.next_generation.fetch_add(1, Ordering::SeqCst);
        let handle = shared
            .runtime
            .spawn(run_retry(Arc::clone(shared), generation, deadline));
        let task = RetryTask {
            generation,
            info: PendingRetry {
                attempt,
                delay,
                deadline,
            },
            handle,
        };
        if let Some(previous) = pending.replace(task) {
            debug!(
                "Retry attempt {} supersedes pending attempt {}",
                attempt, previous.info.attempt
            );
            previous.handle.abort();
        }
        drop(pending);

        debug!(
            "Retry attempt {} of {} scheduled in {:?}",
            attempt, shared.max_retries, delay
        );
        RetryOutcome::Scheduled { attempt, delay }
    }

    /// Run the refresh callback immediately.
    ///
    /// Success clears the error and resets the retry budget; failure stores
    /// the error and keeps `retry_count`. Never limited by `max_retries`.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(action) = self.shared.on_refresh.clone() else {
            return RefreshOutcome::NotConfigured;
        };
        if self.shared.is_torn_down() {
            return RefreshOutcome::Detached;
        }

        self.shared.mutate(|s| {
            s.is_refreshing = true;
            true
        });
        debug!("Refresh started");

        let result = invoke(action).await;
        if self.shared.is_torn_down() {
            debug!("Refresh settled after teardown, result dropped");
            return RefreshOutcome::Detached;
        }

        match result {
            Ok(()) => {
                info!("Refresh succeeded");
                self.shared.mutate(|s| {
                    s.error = None;
                    s.retries_exhausted = false;
                    s.retry_count = 0;
                    s.is_refreshing = false;
                    true
                });
                RefreshOutcome::Refreshed
            }
            Err(err) => {
                warn!("Refresh failed: {}", err);
                self.shared.mutate(|s| {
                    s.error = Some(err.clone());
                    s.retries_exhausted = false;
                    s.is_refreshing = false;
                    true
                });
                RefreshOutcome::Failed(err)
            }
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ResilienceState {
        self.shared.state_tx.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ResilienceState> {
        self.shared.state_tx.subscribe()
    }

    /// The retry currently armed or in flight, if any.
    pub fn pending_retry(&self) -> Option<PendingRetry> {
        self.shared.lock_pending().as_ref().map(|task| task.info)
    }

    pub fn max_retries(&self) -> u32 {
        self.shared.max_retries
    }

    /// Whether both handles act on the same controller.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

/// Owner of one view's resilience state.
///
/// Mount it when the view appears; drop it (or call
/// [`ResilienceController::teardown`]) when the view goes away. Teardown
/// cancels a pending retry and unsubscribes from connectivity changes.
///
/// # Example
///
/// ```ignore
/// use courtside::adapters::mock::{MockConnectivity, StaticTouchCapability};
/// use courtside::domain::{ResilienceConfig, ResilienceController};
///
/// let network = MockConnectivity::online();
/// let controller = ResilienceController::mount(
///     ResilienceConfig::new(),
///     &network,
///     &StaticTouchCapability::touchscreen(),
/// );
/// let actions = controller.actions().clone();
/// actions.retry();
/// ```
pub struct ResilienceController {
    actions: ResilienceActions,
    connectivity_listener: Option<JoinHandle<()>>,
}

impl ResilienceController {
    /// Mount a controller.
    ///
    /// Samples connectivity and touch capability once, then follows
    /// connectivity changes until teardown.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn mount(
        config: ResilienceConfig,
        connectivity: &dyn ConnectivitySource,
        touch: &dyn TouchCapability,
    ) -> Self {
        let mut online_rx = connectivity.subscribe();
        let _ = online_rx.borrow_and_update();
        let is_online = connectivity.is_online();
        let is_touch_device = touch.is_touch_capable();

        let (state_tx, _) = watch::channel(ResilienceState::initial(is_online, is_touch_device));
        let runtime = Handle::current();
        let shared = Arc::new(Shared {
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
            on_retry: config.on_retry,
            on_refresh: config.on_refresh,
            state_tx,
            pending: Mutex::new(None),
            next_generation: AtomicU64::new(0),
            torn_down: AtomicBool::new(false),
            runtime: runtime.clone(),
        });

        let listener = runtime.spawn(mirror_connectivity(Arc::clone(&shared), online_rx));
        debug!(
            "Resilience controller mounted (online: {}, touch: {})",
            is_online, is_touch_device
        );

        Self {
            actions: ResilienceActions { shared },
            connectivity_listener: Some(listener),
        }
    }

    /// Stable action handle for presentation code.
    pub fn actions(&self) -> &ResilienceActions {
        &self.actions
    }

    pub fn state(&self) -> ResilienceState {
        self.actions.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResilienceState> {
        self.actions.subscribe()
    }

    pub fn is_mounted(&self) -> bool {
        !self.actions.shared.is_torn_down()
    }

    /// Cancel the pending retry and stop following connectivity.
    /// Idempotent.
    pub fn teardown(&mut self) {
        let shared = &self.actions.shared;
        if shared.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        shared.cancel_pending();
        if let Some(listener) = self.connectivity_listener.take() {
            listener.abort();
        }
        debug!("Resilience controller torn down");
    }
}

impl Drop for ResilienceController {
    fn drop(&mut self) {
        self.teardown();
    }
}
