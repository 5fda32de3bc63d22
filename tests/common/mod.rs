//! Common test utilities for integration tests.
//!
//! # Example
//!
//! ```ignore
//! let reload = ScriptedReload::new([Err("down".into()), Ok(())]);
//! let config = ResilienceConfig::new().with_retry_action(reload.clone());
//! ```

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use courtside::domain::Reload;
use courtside::error::ErrorValue;

/// Let spawned tasks run until they park again.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

/// A reload callback that replays scripted results and counts calls.
///
/// Once the script runs out every call succeeds.
pub struct ScriptedReload {
    script: Mutex<VecDeque<Result<(), ErrorValue>>>,
    calls: AtomicUsize,
}

impl ScriptedReload {
    pub fn new(script: impl IntoIterator<Item = Result<(), ErrorValue>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn always_ok() -> Arc<Self> {
        Self::new([])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Reload for ScriptedReload {
    async fn reload(&self) -> Result<(), ErrorValue> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}
