use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Sessions older than this, measured from the newest merge, are dropped.
pub const RETENTION_DAYS: i64 = 7;

pub fn retention_window() -> Duration {
    Duration::days(RETENTION_DAYS)
}

/// One start-to-reset run of the timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    #[serde(rename = "date")]
    pub completed_at: DateTime<Utc>,
    #[serde(rename = "duration")]
    pub duration_seconds: u64,
}

impl SessionEntry {
    pub fn new(completed_at: DateTime<Utc>, duration_seconds: u64) -> Self {
        Self {
            completed_at,
            duration_seconds,
        }
    }
}

/// Completed sessions in recording order.
///
/// Serialized as a bare JSON array so the file stays readable by anything
/// that only expects `[{ "date", "duration" }]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionLog {
    entries: Vec<SessionEntry>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SessionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_seconds(&self) -> u64 {
        self.entries.iter().map(|e| e.duration_seconds).sum()
    }

    /// Parses the on-disk form. Blank input is an empty log.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Keeps entries younger than the retention window relative to
    /// `entry.completed_at`, then appends `entry`. Relative order of the
    /// retained entries is preserved.
    pub fn merged_with(&self, entry: SessionEntry) -> SessionLog {
        let window = retention_window();
        let mut entries: Vec<SessionEntry> = self
            .entries
            .iter()
            .filter(|e| entry.completed_at - e.completed_at < window)
            .cloned()
            .collect();
        entries.push(entry);
        SessionLog { entries }
    }
}

impl From<Vec<SessionEntry>> for SessionLog {
    fn from(entries: Vec<SessionEntry>) -> Self {
        Self { entries }
    }
}
