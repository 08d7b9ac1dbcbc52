//! Rolling log of completed sessions.
//!
//! A new session is merged into the stored log by dropping entries older than
//! the retention window and appending the new one. The result is only written
//! when it is larger than what was loaded, and only after the user confirms.

use crate::error::{ReadFailure, StoreError};
use crate::file_store::{FileStore, FsFileStore};
use crate::session_log::{SessionEntry, SessionLog};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Answer from a [`ConfirmationChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Declined,
    Unavailable,
}

/// Asks the user whether a grown log should be saved.
pub trait ConfirmationChannel {
    fn confirm(&mut self, pending: &PendingSave) -> Confirmation;
}

impl<F> ConfirmationChannel for F
where
    F: FnMut(&PendingSave) -> Confirmation,
{
    fn confirm(&mut self, pending: &PendingSave) -> Confirmation {
        self(pending)
    }
}

/// A merged log waiting for the user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    entry: SessionEntry,
    merged: SessionLog,
    original_len: usize,
}

impl PendingSave {
    pub fn entry(&self) -> &SessionEntry {
        &self.entry
    }

    pub fn merged(&self) -> &SessionLog {
        &self.merged
    }

    pub fn original_len(&self) -> usize {
        self.original_len
    }
}

/// Outcome of recording a session.
#[derive(Debug)]
pub enum Decision {
    /// Pruning offset the addition; nothing to save.
    NoGrowth,
    ConfirmationPending(PendingSave),
    Saved,
    Declined,
    Failed(StoreError),
}

#[derive(Debug, Clone)]
pub struct SessionLogStore<F = FsFileStore> {
    files: F,
    path: PathBuf,
}

impl SessionLogStore<FsFileStore> {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::with_files(FsFileStore, path)
    }
}

impl<F: FileStore> SessionLogStore<F> {
    pub fn with_files<P: AsRef<Path>>(files: F, path: P) -> Self {
        Self {
            files,
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current log. A missing file is an empty log.
    pub fn load(&self) -> Result<SessionLog, StoreError> {
        let read_err = |source: ReadFailure| StoreError::StorageRead {
            path: self.path.clone(),
            source,
        };

        if !self.files.exists(&self.path) {
            return Ok(SessionLog::new());
        }
        match self.files.read(&self.path) {
            Ok(Some(text)) => SessionLog::from_json(&text).map_err(|e| read_err(e.into())),
            Ok(None) => Ok(SessionLog::new()),
            Err(e) => Err(read_err(e.into())),
        }
    }

    /// Loads, prunes and merges `entry`. Never writes.
    ///
    /// Growth is decided by comparing lengths only, so a merge that prunes one
    /// stale entry while adding the new one reports [`Decision::NoGrowth`].
    pub fn begin(&self, entry: SessionEntry) -> Decision {
        let original = match self.load() {
            Ok(log) => log,
            Err(e) => {
                warn!(error = %e, "session log unreadable, skipping merge");
                return Decision::Failed(e);
            }
        };

        let merged = original.merged_with(entry.clone());
        debug!(
            original = original.len(),
            merged = merged.len(),
            "merged session into log"
        );

        if merged.len() > original.len() {
            Decision::ConfirmationPending(PendingSave {
                entry,
                merged,
                original_len: original.len(),
            })
        } else {
            Decision::NoGrowth
        }
    }

    /// Applies the user's answer to a pending merge.
    pub fn resolve(&self, pending: PendingSave, answer: Confirmation) -> Decision {
        match answer {
            Confirmation::Accepted => match self.save(&pending.merged) {
                Ok(()) => {
                    info!(
                        entries = pending.merged.len(),
                        duration = pending.entry.duration_seconds,
                        "session log saved"
                    );
                    Decision::Saved
                }
                Err(e) => {
                    warn!(error = %e, "session log write failed");
                    Decision::Failed(e)
                }
            },
            Confirmation::Declined => {
                debug!("session save declined");
                Decision::Declined
            }
            Confirmation::Unavailable => {
                warn!("confirmation prompt unavailable, session not saved");
                Decision::Failed(StoreError::ConfirmationUnavailable)
            }
        }
    }

    /// Merges `entry` and, when the log grew, asks `channel` before saving.
    pub fn record_session<C>(&self, entry: SessionEntry, channel: &mut C) -> Decision
    where
        C: ConfirmationChannel + ?Sized,
    {
        match self.begin(entry) {
            Decision::ConfirmationPending(pending) => {
                let answer = channel.confirm(&pending);
                self.resolve(pending, answer)
            }
            other => other,
        }
    }

    fn save(&self, log: &SessionLog) -> Result<(), StoreError> {
        let write_err = |source: std::io::Error| StoreError::StorageWrite {
            path: self.path.clone(),
            source,
        };
        let text = log.to_json().map_err(|e| write_err(e.into()))?;
        self.files.write(&self.path, &text).map_err(write_err)
    }
}
