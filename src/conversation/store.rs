//! Durable conversation history
//!
//! The history is persisted wholesale as a single JSON document:
//!
//! ```json
//! { "last_updated": "2026-01-01T10:00:00+05:30", "conversations": [{ "role": "user", "content": "..." }] }
//! ```
//!
//! Persistence is best-effort. A missing or corrupt file loads as an empty
//! history and failed writes are logged, never raised.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::History;
use crate::{Error, Result};

/// Storage backend for the conversation history
pub trait HistoryStore {
    /// Load the stored history, or an empty one if none can be read
    fn load(&self) -> History;

    /// Persist the whole history, replacing any previous record
    ///
    /// Returns `false` if the write failed (the failure is logged).
    fn save(&self, history: &History) -> bool;

    /// Remove the durable record
    ///
    /// Returns `false` if the record exists but could not be removed.
    fn delete(&self) -> bool;
}

/// On-disk document layout, as written
#[derive(Serialize)]
struct HistoryRecord<'a> {
    last_updated: DateTime<Local>,
    conversations: &'a History,
}

/// On-disk document layout, as read; `last_updated` is informational only
#[derive(Deserialize)]
struct StoredRecord {
    #[serde(default)]
    conversations: History,
}

/// History persisted to a JSON file
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record, `None` if the file does not exist
    fn read(&self) -> Result<Option<History>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let record: StoredRecord = serde_json::from_str(&content)?;
        Ok(Some(record.conversations))
    }

    /// Write the record through a sibling temp file so a crash never truncates it
    fn write(&self, history: &History) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let record = HistoryRecord {
            last_updated: Local::now(),
            conversations: history,
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, &record)?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path)
            .map_err(|e| Error::History(format!("failed to replace history file: {e}")))?;
        Ok(())
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> History {
        match self.read() {
            Ok(Some(history)) => {
                tracing::info!(
                    path = %self.path.display(),
                    messages = history.len(),
                    "loaded conversation history"
                );
                history
            }
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "no conversation history file");
                History::new()
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "could not load conversation history, starting empty"
                );
                History::new()
            }
        }
    }

    fn save(&self, history: &History) -> bool {
        match self.write(history) {
            Ok(()) => {
                tracing::debug!(
                    path = %self.path.display(),
                    messages = history.len(),
                    "conversation history saved"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "could not save conversation history"
                );
                false
            }
        }
    }

    fn delete(&self) -> bool {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "conversation history file removed");
                true
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "could not remove conversation history file"
                );
                false
            }
        }
    }
}
