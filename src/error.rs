//! Error types shared by the session log and the timer.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why an existing session log could not be loaded.
#[derive(Debug, Error)]
pub enum ReadFailure {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures surfaced by [`crate::store::SessionLogStore`].
///
/// None of these are fatal: the on-disk log is left untouched and the caller
/// reports the error. There is no retry; the next reset is a fresh attempt.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The log file exists but could not be read or parsed.
    #[error("failed to read session log {}: {source}", path.display())]
    StorageRead {
        path: PathBuf,
        #[source]
        source: ReadFailure,
    },

    /// Writing the merged log failed after the user confirmed.
    #[error("failed to write session log {}: {source}", path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The confirmation prompt could not be shown.
    #[error("confirmation prompt unavailable")]
    ConfirmationUnavailable,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("cannot {command} while {from}")]
    InvalidTransition {
        from: &'static str,
        command: &'static str,
    },
}
