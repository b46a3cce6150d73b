//! Tracing setup: stdout plus an optional daily log file.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::LoggingError;

/// File name prefix for the rolling log; the appender adds the date suffix.
pub const LOG_FILE_PREFIX: &str = "taskscheduler.log";

/// Keeps the non-blocking file writer alive. Dropping it flushes pending lines,
/// so `main` holds it for the lifetime of the process.
#[must_use = "dropping the guard stops the log file writer"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Build the level filter. `RUST_LOG` wins over the configured default.
pub fn build_filter(default_level: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level).map_err(|e| LoggingError::Filter(e.to_string())),
    }
}

/// Install the global subscriber. Call once, from `main`.
pub fn init(config: &LoggingConfig) -> Result<LogGuard, LoggingError> {
    let filter = build_filter(&config.level)?;

    let (file_layer, guard) = if config.file {
        std::fs::create_dir_all(&config.path).map_err(|source| LoggingError::CreateDir {
            path: config.path.display().to_string(),
            source,
        })?;
        let appender = tracing_appender::rolling::daily(&config.path, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_ansi(false).with_writer(writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_level(true))
        .with(file_layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInstalled)?;

    Ok(LogGuard { _file: guard })
}
