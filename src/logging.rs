//! File logging for the terminal viewer.
//!
//! The terminal is in raw mode while the viewer runs, so log lines go to a
//! file instead of stderr.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const ENV_LOG: &str = "COURTSIDE_LOG";

const DEFAULT_FILTER: &str = "courtside=info";
const LOG_FILE: &str = "courtside.log";

/// Directory holding the log file, under the platform's local data dir.
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("courtside")
}

/// Filter from `COURTSIDE_LOG`, falling back to `courtside=info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber and return the log file path.
///
/// # Errors
///
/// Fails when the log directory or file cannot be created, or a subscriber
/// is already installed.
pub fn init_logging() -> Result<PathBuf> {
    let dir = log_dir();
    fs::create_dir_all(&dir).wrap_err_with(|| format!("Failed to create {:?}", dir))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to install logger: {}", e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_log_dir_is_namespaced() {
        assert!(log_dir().ends_with("courtside"));
    }

    #[test]
    #[serial]
    fn test_env_filter_default_and_override() {
        std::env::remove_var(ENV_LOG);
        assert_eq!(env_filter().to_string(), DEFAULT_FILTER);

        std::env::set_var(ENV_LOG, "courtside=debug");
        let filter = env_filter();
        std::env::remove_var(ENV_LOG);
        assert_eq!(filter.to_string(), "courtside=debug");
    }
}
