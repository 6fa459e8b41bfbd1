//! Append-only run history (`run_history.json`).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::clock::RunClock;
use crate::error::Result;

const HISTORY_FILE: &str = "run_history.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    NoData,
    Error,
}

/// One line of run history. Written once, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunHistoryEntry {
    pub timestamp: String,
    pub date: String,
    pub status: RunStatus,
    pub records_scraped: usize,
    pub error: Option<String>,
}

impl RunHistoryEntry {
    pub fn new(clock: &RunClock, status: RunStatus, records_scraped: usize, error: Option<String>) -> Self {
        Self {
            timestamp: clock.timestamp(),
            date: clock.date_only(),
            status,
            records_scraped,
            error,
        }
    }
}

/// JSON array of [`RunHistoryEntry`] in the log folder.
pub struct RunHistory {
    path: PathBuf,
}

impl RunHistory {
    pub fn in_dir(log_dir: &Path) -> Self {
        Self {
            path: log_dir.join(HISTORY_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Existing entries. A missing or unreadable file counts as empty.
    pub fn load(&self) -> Vec<RunHistoryEntry> {
        let Ok(data) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        match serde_json::from_str(&data) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Run history unreadable, starting fresh");
                Vec::new()
            }
        }
    }

    /// Add `entry` after all existing entries.
    pub fn append(&self, entry: RunHistoryEntry) -> Result<()> {
        let mut entries = self.load();
        entries.push(entry);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn clock() -> RunClock {
        RunClock::at(Utc.with_ymd_and_hms(2024, 1, 1, 2, 30, 0).unwrap())
    }

    #[test]
    fn test_append_preserves_prior_entries() {
        let dir = tempfile::tempdir().unwrap();
        let history = RunHistory::in_dir(dir.path());

        history
            .append(RunHistoryEntry::new(&clock(), RunStatus::Success, 42, None))
            .unwrap();
        history
            .append(RunHistoryEntry::new(&clock(), RunStatus::Error, 0, Some("boom".into())))
            .unwrap();

        let entries = history.load();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].status, RunStatus::Success);
        assert_eq!(entries[0].records_scraped, 42);
        assert_eq!(entries[0].timestamp, "2024-01-01_08-00-00");
        assert_eq!(entries[1].error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_wire_format() {
        let entry = RunHistoryEntry::new(&clock(), RunStatus::NoData, 0, None);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "timestamp": "2024-01-01_08-00-00",
                "date": "2024-01-01",
                "status": "no_data",
                "records_scraped": 0,
                "error": null,
            })
        );
    }

    #[test]
    fn test_corrupt_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let history = RunHistory::in_dir(&dir.path().join("logs"));
        fs::create_dir_all(dir.path().join("logs")).unwrap();
        fs::write(history.path(), "not json").unwrap();

        assert!(history.load().is_empty());
        history
            .append(RunHistoryEntry::new(&clock(), RunStatus::Success, 1, None))
            .unwrap();
        assert_eq!(history.load().len(), 1);
    }
}
