#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Logging setup for restgate binaries.
//!
//! Libraries only emit `tracing` events. Binaries call [`init`] once, with
//! the level from the configuration file or the command line; `RUST_LOG`
//! overrides both.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The level is not a valid filter directive
    #[error("invalid log level {level:?}: {reason}")]
    InvalidLevel {
        /// Level as given
        level: String,
        /// Parser message
        reason: String,
    },
    /// The log file could not be opened
    #[error("failed to open log file {path}: {source}")]
    File {
        /// Log file path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// A global subscriber is already installed
    #[error("logging already initialized")]
    AlreadyInitialized,
}

/// Filter for `level` ("info", "debug", "restgate_pipeline=trace", ...)
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidLevel {
        level: level.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber, writing to stderr or appending to `file`.
pub fn init(level: &str, file: Option<&Path>) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(level)?,
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match file {
        Some(path) => {
            let file = open_log_file(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|_| LoggingError::AlreadyInitialized)
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::File { path: path.to_path_buf(), source })
}

/// Emit a trace event tagged with a module label.
pub fn trace(module: &str, msg: &str) {
    tracing::trace!(module, "{}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter() {
        assert!(build_filter("info").is_ok());
        assert!(build_filter("restgate_pipeline=debug,warn").is_ok());
        match build_filter("restgate=loud") {
            Err(LoggingError::InvalidLevel { level, .. }) => assert_eq!(level, "restgate=loud"),
            other => panic!("expected InvalidLevel, got {:?}", other),
        }
    }

    #[test]
    fn test_open_log_file() {
        let dir = tempfile::tempdir().expect("Failed to create temporary directory");
        let path = dir.path().join("restgate.log");
        open_log_file(&path).expect("open");
        assert!(path.exists());

        let missing = dir.path().join("missing").join("restgate.log");
        assert!(matches!(open_log_file(&missing), Err(LoggingError::File { .. })));
    }
}
