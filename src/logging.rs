//! File-backed tracing setup.
//!
//! The terminal UI owns stdout, so log lines go to a file under the data
//! directory. `RUST_LOG` overrides the configured level.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::EnvFilter;

static LOGGING_INITIALIZED: OnceLock<()> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("logging already initialized")]
    AlreadyInitialized,

    #[error("invalid log level: {0}")]
    InvalidLevel(String),

    #[error("failed to open log file: {0}")]
    FileOpen(#[from] io::Error),

    #[error("failed to set global subscriber: {0}")]
    SetSubscriber(String),
}

pub fn init_logging(level: &str, file: &Path) -> Result<(), LogError> {
    if LOGGING_INITIALIZED.get().is_some() {
        return Err(LogError::AlreadyInitialized);
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|_| LogError::InvalidLevel(level.to_string()))?,
    };

    if let Some(parent) = file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let writer = OpenOptions::new().create(true).append(true).open(file)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(writer))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| LogError::SetSubscriber(e.to_string()))?;

    let _ = LOGGING_INITIALIZED.set(());
    Ok(())
}
