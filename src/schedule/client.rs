//! HTTP client for the league schedule endpoint.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use super::model::Schedule;
use crate::error::{classify_reqwest_error, LoadError, PlatformResult};

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches a tournament schedule as JSON.
#[derive(Debug, Clone)]
pub struct ScheduleClient {
    http: Client,
    url: String,
}

impl ScheduleClient {
    /// Create a client with its own connection pool.
    pub fn new(url: impl Into<String>, timeout: Duration) -> PlatformResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, url))
    }

    /// Create a client sharing an existing connection pool.
    pub fn with_client(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and decode the schedule.
    pub async fn fetch(&self) -> Result<Schedule, LoadError> {
        let response = self
            .http
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e, &self.url))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            return Err(LoadError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Unexpected status")
                    .to_string(),
            });
        }

        response
            .json::<Schedule>()
            .await
            .map_err(|e| classify_reqwest_error(&e, &self.url))
    }
}
