//! End-to-end lifecycle of a mounted resilience controller.
//!
//! Time is paused, so backoff delays are driven with `tokio::time::advance`.

mod common;

use std::time::Duration;

use common::{settle, ScriptedReload};
use courtside::adapters::mock::{MockConnectivity, StaticTouchCapability};
use courtside::domain::{
    RefreshOutcome, ResilienceConfig, ResilienceController, RetryOutcome,
    RETRY_EXHAUSTED_MESSAGE,
};
use courtside::error::{ErrorValue, LoadError};

fn mount(
    config: ResilienceConfig,
    network: &MockConnectivity,
) -> ResilienceController {
    ResilienceController::mount(config, network, &StaticTouchCapability::pointer_only())
}

#[tokio::test(start_paused = true)]
async fn test_retry_budget_of_two_then_terminal_message() {
    let reload = ScriptedReload::new([
        Err(ErrorValue::from(LoadError::Offline)),
        Err(ErrorValue::from(LoadError::Offline)),
    ]);
    let network = MockConnectivity::online();
    let controller = mount(
        ResilienceConfig::new()
            .with_max_retries(2)
            .with_retry_delay(Duration::from_millis(100))
            .with_retry_action(reload.clone()),
        &network,
    );
    let actions = controller.actions().clone();

    actions.set_error("Network error");
    assert_eq!(
        actions.retry(),
        RetryOutcome::Scheduled {
            attempt: 1,
            delay: Duration::from_millis(100)
        }
    );
    let state = actions.state();
    assert!(state.is_loading);
    assert_eq!(state.retry_count, 1);

    // Nothing fires before the first delay elapses
    tokio::time::advance(Duration::from_millis(99)).await;
    settle().await;
    assert_eq!(reload.calls(), 0);

    tokio::time::advance(Duration::from_millis(1)).await;
    settle().await;
    assert_eq!(reload.calls(), 1);
    let state = actions.state();
    assert!(!state.is_loading);
    assert_eq!(state.error, Some(ErrorValue::from(LoadError::Offline)));

    // Second attempt doubles the delay
    assert_eq!(
        actions.retry(),
        RetryOutcome::Scheduled {
            attempt: 2,
            delay: Duration::from_millis(200)
        }
    );
    tokio::time::advance(Duration::from_millis(199)).await;
    settle().await;
    assert_eq!(reload.calls(), 1);
    tokio::time::advance(Duration::from_millis(1)).await;
    settle().await;
    assert_eq!(reload.calls(), 2);
    assert_eq!(actions.state().retry_count, 2);

    // Budget spent
    assert_eq!(actions.retry(), RetryOutcome::Exhausted);
    let state = actions.state();
    assert!(state.is_retry_exhausted());
    assert_eq!(
        state.error.as_ref().map(|e| e.user_message()),
        Some(RETRY_EXHAUSTED_MESSAGE.to_string())
    );
    assert_eq!(state.retry_count, 2);
    assert!(!state.is_loading);

    tokio::time::advance(Duration::from_secs(10)).await;
    settle().await;
    assert_eq!(reload.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_successful_retry_clears_error_and_budget() {
    let reload = ScriptedReload::always_ok();
    let network = MockConnectivity::online();
    let controller = mount(
        ResilienceConfig::new()
            .with_retry_delay(Duration::from_millis(100))
            .with_retry_action(reload.clone()),
        &network,
    );
    let actions = controller.actions();

    actions.set_error("Network error");
    actions.retry();
    tokio::time::advance(Duration::from_millis(100)).await;
    settle().await;

    let state = actions.state();
    assert_eq!(reload.calls(), 1);
    assert!(state.error.is_none());
    assert_eq!(state.retry_count, 0);
    assert!(!state.is_loading);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_cancels_pending_retry() {
    let reload = ScriptedReload::always_ok();
    let network = MockConnectivity::online();
    let mut controller = mount(
        ResilienceConfig::new()
            .with_retry_delay(Duration::from_millis(100))
            .with_retry_action(reload.clone()),
        &network,
    );
    let actions = controller.actions().clone();

    actions.set_error("Network error");
    actions.retry();
    assert!(actions.pending_retry().is_some());

    controller.teardown();
    assert!(!controller.is_mounted());
    assert!(actions.pending_retry().is_none());

    tokio::time::advance(Duration::from_secs(5)).await;
    settle().await;
    assert_eq!(reload.calls(), 0);
    assert_eq!(actions.retry(), RetryOutcome::Detached);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_recovers_after_exhaustion() {
    let retry = ScriptedReload::new([Err(ErrorValue::from("still down"))]);
    let refresh = ScriptedReload::always_ok();
    let network = MockConnectivity::online();
    let controller = mount(
        ResilienceConfig::new()
            .with_max_retries(1)
            .with_retry_delay(Duration::from_millis(50))
            .with_retry_action(retry.clone())
            .with_refresh_action(refresh.clone()),
        &network,
    );
    let actions = controller.actions();

    actions.set_error("down");
    actions.retry();
    tokio::time::advance(Duration::from_millis(50)).await;
    settle().await;
    assert_eq!(actions.retry(), RetryOutcome::Exhausted);

    assert_eq!(actions.refresh().await, RefreshOutcome::Refreshed);
    let state = actions.state();
    assert!(state.error.is_none());
    assert_eq!(state.retry_count, 0);
    assert!(!state.is_refreshing);
    assert_eq!(refresh.calls(), 1);

    // Budget is available again
    assert!(matches!(
        actions.retry(),
        RetryOutcome::Scheduled { attempt: 1, .. }
    ));
}

#[tokio::test]
async fn test_connectivity_is_mirrored_until_teardown() {
    let network = MockConnectivity::online();
    let mut controller = mount(ResilienceConfig::new(), &network);
    let mut rx = controller.subscribe();
    assert!(controller.state().is_online);

    network.go_offline();
    rx.changed().await.unwrap();
    assert!(!rx.borrow_and_update().is_online);

    network.go_online();
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().is_online);

    controller.teardown();
    settle().await;
    assert_eq!(network.subscriber_count(), 0);

    network.go_offline();
    settle().await;
    assert!(controller.state().is_online);
}

#[tokio::test]
async fn test_touch_capability_sampled_at_mount() {
    let network = MockConnectivity::offline();
    let touch = ResilienceController::mount(
        ResilienceConfig::new(),
        &network,
        &StaticTouchCapability::touchscreen(),
    );
    let pointer = mount(ResilienceConfig::new(), &network);

    assert!(touch.state().is_touch_device);
    assert!(!touch.state().is_online);
    assert!(!pointer.state().is_touch_device);
}
