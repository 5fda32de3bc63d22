//! Viewer configuration.
//!
//! Settings come from the environment so the viewer can be pointed at any
//! league deployment without a config file.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `COURTSIDE_SCHEDULE_URL` | required |
//! | `COURTSIDE_HEALTH_URL` | the schedule URL |
//! | `COURTSIDE_POLL_SECS` | 15 |
//! | `COURTSIDE_CELL_PX` | 8 |
//! | `COURTSIDE_MAX_RETRIES` | 3 |
//! | `COURTSIDE_RETRY_DELAY_MS` | 1000 |

use std::str::FromStr;
use std::time::Duration;

use crate::adapters::DEFAULT_CELL_WIDTH_PX;
use crate::domain::ResilienceConfig;
use crate::error::{PlatformError, PlatformResult};
use crate::schedule::DEFAULT_REQUEST_TIMEOUT;

pub const ENV_SCHEDULE_URL: &str = "COURTSIDE_SCHEDULE_URL";
pub const ENV_HEALTH_URL: &str = "COURTSIDE_HEALTH_URL";
pub const ENV_POLL_SECS: &str = "COURTSIDE_POLL_SECS";
pub const ENV_CELL_PX: &str = "COURTSIDE_CELL_PX";

/// Default connectivity poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Configuration for the terminal viewer.
///
/// # Example
///
/// ```ignore
/// use courtside::config::ViewerConfig;
/// use std::time::Duration;
///
/// let config = ViewerConfig::new("https://league.example/api/schedule")
///     .with_poll_interval(Duration::from_secs(30))
///     .with_cell_width_px(10);
/// ```
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Schedule JSON endpoint
    pub schedule_url: String,
    /// URL polled for reachability
    pub health_url: String,
    /// How often reachability is checked
    pub poll_interval: Duration,
    /// Timeout for schedule and health requests
    pub request_timeout: Duration,
    /// Logical pixels per terminal column
    pub cell_width_px: u32,
    /// Retry budget and backoff for the schedule view
    pub resilience: ResilienceConfig,
}

impl ViewerConfig {
    /// Create a config with defaults for everything but the schedule URL.
    pub fn new(schedule_url: impl Into<String>) -> Self {
        let schedule_url = schedule_url.into();
        Self {
            health_url: schedule_url.clone(),
            schedule_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cell_width_px: DEFAULT_CELL_WIDTH_PX,
            resilience: ResilienceConfig::default(),
        }
    }

    pub fn with_health_url(mut self, url: impl Into<String>) -> Self {
        self.health_url = url.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_cell_width_px(mut self, px: u32) -> Self {
        self.cell_width_px = px;
        self
    }

    pub fn with_resilience(mut self, resilience: ResilienceConfig) -> Self {
        self.resilience = resilience;
        self
    }

    /// Build from environment variables.
    ///
    /// # Errors
    ///
    /// Fails when the schedule URL is unset or a numeric setting does not
    /// parse. Zero poll interval and zero cell width are rejected too.
    pub fn from_env() -> PlatformResult<Self> {
        let schedule_url = std::env::var(ENV_SCHEDULE_URL)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .ok_or(PlatformError::MissingSetting(ENV_SCHEDULE_URL))?;

        let mut config = Self::new(schedule_url.trim());
        if let Ok(url) = std::env::var(ENV_HEALTH_URL) {
            if !url.trim().is_empty() {
                config.health_url = url.trim().to_string();
            }
        }
        if let Some(secs) = parse_positive::<u64>(ENV_POLL_SECS)? {
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Some(px) = parse_positive::<u32>(ENV_CELL_PX)? {
            config.cell_width_px = px;
        }
        config.resilience = config.resilience.with_env_overrides();
        Ok(config)
    }
}

fn parse_positive<T>(name: &'static str) -> PlatformResult<Option<T>>
where
    T: FromStr + PartialEq + Default,
{
    let Ok(raw) = std::env::var(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => Ok(Some(value)),
        _ => Err(PlatformError::InvalidSetting { name, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [ENV_SCHEDULE_URL, ENV_HEALTH_URL, ENV_POLL_SECS, ENV_CELL_PX] {
            std::env::remove_var(name);
        }
    }

    #[test]
    fn test_new_defaults() {
        let config = ViewerConfig::new("http://league.test/schedule");
        assert_eq!(config.health_url, "http://league.test/schedule");
        assert_eq!(config.poll_interval, Duration::from_secs(15));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.cell_width_px, 8);
        assert_eq!(config.resilience.max_retries, 3);
    }

    #[test]
    fn test_builders() {
        let config = ViewerConfig::new("http://league.test/schedule")
            .with_health_url("http://league.test/health")
            .with_poll_interval(Duration::from_secs(5))
            .with_request_timeout(Duration::from_secs(3))
            .with_cell_width_px(10)
            .with_resilience(ResilienceConfig::new().with_max_retries(1));
        assert_eq!(config.health_url, "http://league.test/health");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.cell_width_px, 10);
        assert_eq!(config.resilience.max_retries, 1);
    }

    #[test]
    #[serial]
    fn test_from_env_requires_schedule_url() {
        clear_env();
        let err = ViewerConfig::from_env().unwrap_err();
        assert!(matches!(err, PlatformError::MissingSetting(ENV_SCHEDULE_URL)));
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        clear_env();
        std::env::set_var(ENV_SCHEDULE_URL, "http://league.test/schedule");
        std::env::set_var(ENV_HEALTH_URL, "http://league.test/health");
        std::env::set_var(ENV_POLL_SECS, "30");
        std::env::set_var(ENV_CELL_PX, "10");
        let config = ViewerConfig::from_env();
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.schedule_url, "http://league.test/schedule");
        assert_eq!(config.health_url, "http://league.test/health");
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.cell_width_px, 10);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_numbers() {
        clear_env();
        std::env::set_var(ENV_SCHEDULE_URL, "http://league.test/schedule");
        std::env::set_var(ENV_POLL_SECS, "0");
        let err = ViewerConfig::from_env().unwrap_err();
        clear_env();

        assert!(matches!(
            err,
            PlatformError::InvalidSetting {
                name: ENV_POLL_SECS,
                ..
            }
        ));
    }
}
