//! Reachability monitor backed by periodic HTTP requests.
//!
//! A terminal has no host "online" event, so connectivity is inferred: any
//! HTTP response from the health URL, whatever its status, means the network
//! path is up. Connection failures and timeouts mean offline.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::error::PlatformResult;
use crate::traits::ConnectivitySource;

/// Polls a URL and publishes reachability transitions.
///
/// Starts out assuming online so a slow first check does not flash an
/// offline banner.
///
/// # Example
///
/// ```ignore
/// use courtside::adapters::HttpConnectivityMonitor;
/// use std::time::Duration;
///
/// let url = "https://league.example/health";
/// let mut monitor = HttpConnectivityMonitor::new(url, Duration::from_secs(5))?;
/// monitor.start_polling(Duration::from_secs(15));
/// ```
pub struct HttpConnectivityMonitor {
    http: Client,
    url: String,
    online_tx: Arc<watch::Sender<bool>>,
    poller: Option<JoinHandle<()>>,
}

impl HttpConnectivityMonitor {
    pub fn new(url: impl Into<String>, timeout: Duration) -> PlatformResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, url))
    }

    pub fn with_client(http: Client, url: impl Into<String>) -> Self {
        let (online_tx, _) = watch::channel(true);
        Self {
            http,
            url: url.into(),
            online_tx: Arc::new(online_tx),
            poller: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Spawn the background poller, replacing any previous one.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_polling(&mut self, every: Duration) {
        self.stop_polling();
        let http = self.http.clone();
        let url = self.url.clone();
        let online_tx = Arc::clone(&self.online_tx);
        self.poller = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let online = reachable(&http, &url).await;
                publish(&online_tx, online);
            }
        }));
    }

    pub fn stop_polling(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_some()
    }
}

impl Drop for HttpConnectivityMonitor {
    fn drop(&mut self) {
        self.stop_polling();
    }
}

#[async_trait]
impl ConnectivitySource for HttpConnectivityMonitor {
    fn is_online(&self) -> bool {
        *self.online_tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.online_tx.subscribe()
    }

    async fn recheck(&self) -> bool {
        let online = reachable(&self.http, &self.url).await;
        publish(&self.online_tx, online);
        online
    }
}

async fn reachable(http: &Client, url: &str) -> bool {
    match http.head(url).send().await {
        Ok(response) => {
            debug!("Health check {} answered {}", url, response.status());
            true
        }
        Err(e) => {
            debug!("Health check {} failed: {}", url, e);
            false
        }
    }
}

fn publish(online_tx: &watch::Sender<bool>, online: bool) {
    let changed = online_tx.send_if_modified(|current| {
        if *current == online {
            return false;
        }
        *current = online;
        true
    });
    if changed {
        info!(
            "Connectivity changed: {}",
            if online { "online" } else { "offline" }
        );
    }
}
