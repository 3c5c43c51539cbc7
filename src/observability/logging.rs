//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Write to a daily rotated log file, or stdout when asked
//! - Keep a bounded number of rotated files
//!
//! `RUST_LOG` takes precedence over the configured level.

use std::path::Path;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, Rotation, RollingFileAppender};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("cannot open log file: {0}")]
    Appender(#[from] InitError),

    #[error("logging already initialized: {0}")]
    Init(#[from] TryInitError),
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process. It is `None` when logging to stdout.
pub fn init_logging(
    config: &LoggingConfig,
    to_stdout: bool,
) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!("{},lapin=warn", config.level))?,
    };

    if to_stdout {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init()?;
        return Ok(None);
    }

    let appender = file_appender(&config.file, config.max_files)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()?;

    Ok(Some(guard))
}

/// Daily rotated appender for `path`; rotated files get a date suffix.
pub fn file_appender(path: &Path, max_files: usize) -> Result<RollingFileAppender, InitError> {
    let directory = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let prefix = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "datacollector.log".to_string());

    let mut builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix);
    if max_files > 0 {
        builder = builder.max_log_files(max_files);
    }

    builder.build(directory)
}
