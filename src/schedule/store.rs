//! Latest loaded schedule, shared between the loader and the view.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::debug;

use super::client::ScheduleClient;
use super::model::Schedule;
use crate::domain::Reload;
use crate::error::ErrorValue;

/// A schedule snapshot and when it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSchedule {
    pub schedule: Schedule,
    pub fetched_at: DateTime<Utc>,
}

/// Holds the last successfully loaded schedule.
///
/// A failed load never clears it, so the view keeps showing stale data while
/// offline.
#[derive(Clone)]
pub struct ScheduleStore {
    latest_tx: Arc<watch::Sender<Option<Arc<LoadedSchedule>>>>,
}

impl ScheduleStore {
    pub fn new() -> Self {
        let (latest_tx, _) = watch::channel(None);
        Self {
            latest_tx: Arc::new(latest_tx),
        }
    }

    pub fn replace(&self, schedule: Schedule) {
        let loaded = LoadedSchedule {
            schedule,
            fetched_at: Utc::now(),
        };
        self.latest_tx.send_replace(Some(Arc::new(loaded)));
    }

    pub fn latest(&self) -> Option<Arc<LoadedSchedule>> {
        self.latest_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<LoadedSchedule>>> {
        self.latest_tx.subscribe()
    }

    /// A reload action that fetches with `client` and stores the result.
    /// Suitable as both the retry and the refresh callback.
    pub fn loader(&self, client: ScheduleClient) -> Arc<dyn Reload> {
        Arc::new(ScheduleLoader {
            client,
            store: self.clone(),
        })
    }
}

impl Default for ScheduleStore {
    fn default() -> Self {
        Self::new()
    }
}

struct ScheduleLoader {
    client: ScheduleClient,
    store: ScheduleStore,
}

#[async_trait]
impl Reload for ScheduleLoader {
    async fn reload(&self) -> Result<(), ErrorValue> {
        let schedule = self.client.fetch().await?;
        debug!(
            "Loaded {} fixtures for {}",
            schedule.fixtures.len(),
            schedule.tournament
        );
        self.store.replace(schedule);
        Ok(())
    }
}
