//! Logging configuration using tracing
//!
//! The terminal belongs to the dashboard while it runs, so logs go to a file in
//! the XDG cache directory, or the system temp directory when there is no home
//! directory. Only `--dump` mode logs to stderr.

use directories::ProjectDirs;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the log file inside the log directory
pub const LOG_FILE_NAME: &str = "carbondash.log";

/// Errors that can occur while setting up logging
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log directory or file could not be created
    #[error("Failed to open log file: {0}")]
    Io(#[from] std::io::Error),

    /// A global subscriber is already installed
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

/// Default log directory (`~/.cache/carbondash/` on Linux)
///
/// Returns `None` if no home directory can be determined.
pub fn default_log_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "carbondash").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Log directory for the terminal UI, which must never log to stderr
///
/// Uses [`default_log_dir`], falling back to `carbondash/` under the system
/// temp directory when there is no home directory.
pub fn tui_log_dir() -> PathBuf {
    default_log_dir().unwrap_or_else(|| std::env::temp_dir().join("carbondash"))
}

/// Builds the filter from `RUST_LOG`, defaulting to "warn"
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initialize the tracing subscriber
///
/// # Arguments
/// * `log_dir` - Directory for the log file; `None` logs to stderr
///
/// # Returns
/// * `Ok(Some(path))` - Logging to the file at `path`
/// * `Ok(None)` - Logging to stderr
/// * `Err(LoggingError)` - If the file cannot be opened or a subscriber is already set
pub fn init(log_dir: Option<&Path>) -> Result<Option<PathBuf>, LoggingError> {
    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| LoggingError::Init(e.to_string()))?;
        return Ok(None);
    };

    fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(Some(path))
}
