//! Durable single-slot state: the context snapshot and the update cursor.
//!
//! Both are small JSON files. The snapshot is replaced with a
//! write-then-rename so a concurrent reader sees either the previous or the
//! new snapshot, never a torn one.

use crate::types::{ContextSnapshot, FactCheckError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Atomically replace the live snapshot.
    pub fn save(&self, snapshot: &ContextSnapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, json).map_err(|e| snapshot_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| snapshot_error(&self.path, e))?;

        debug!("Snapshot written to {}", self.path.display());
        Ok(())
    }

    /// Load the live snapshot, if one has been written.
    pub fn load(&self) -> Result<Option<ContextSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path).map_err(|e| snapshot_error(&self.path, e))?;
        Ok(Some(serde_json::from_str(&json)?))
    }
}

fn snapshot_error(path: &Path, e: std::io::Error) -> FactCheckError {
    FactCheckError::Snapshot(format!("{}: {}", path.display(), e))
}

#[derive(Debug, Serialize, Deserialize)]
struct CursorRecord {
    last_update: DateTime<Utc>,
    status: String,
}

/// Timestamp of the most recent successful ingestion cycle. Used only for
/// the startup catch-up decision; a missing or unreadable cursor reads as
/// "never ran".
pub struct CursorStore {
    path: PathBuf,
}

impl CursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Option<DateTime<Utc>> {
        if !self.path.exists() {
            return None;
        }
        match fs::read_to_string(&self.path)
            .map_err(FactCheckError::Io)
            .and_then(|json| Ok(serde_json::from_str::<CursorRecord>(&json)?))
        {
            Ok(record) => Some(record.last_update),
            Err(e) => {
                warn!("Could not read update cursor, treating as stale: {}", e);
                None
            }
        }
    }

    pub fn save_success(&self, at: DateTime<Utc>) -> Result<()> {
        let record = CursorRecord {
            last_update: at,
            status: "success".to_string(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&record)?)?;
        Ok(())
    }
}
