//! File-backed snapshot persistence.
//!
//! The file is read once at the start of a run and fully overwritten once, via a
//! sibling temp file and a rename, so an interrupted write leaves the previous
//! snapshot intact.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::models::{LoadedSnapshot, Snapshot};
use crate::domains::listings::ListingRecord;
use crate::error::SnapshotError;

/// Bump whenever the shape of `ListingRecord` changes.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Loose view of whatever is on disk; records are only decoded once the version matches.
#[derive(Debug, Deserialize)]
struct StoredSnapshot {
    #[serde(rename = "schemaVersion", default)]
    schema_version: Option<u32>,
    #[serde(default)]
    records: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
    schema_version: u32,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>, schema_version: u32) -> Self {
        Self {
            path: path.into(),
            schema_version,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and classify the snapshot left by the previous run.
    pub async fn load_old(&self) -> Result<LoadedSnapshot, SnapshotError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No snapshot file yet, treating as first run");
                return Ok(LoadedSnapshot::first());
            }
            Err(source) => {
                return Err(SnapshotError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        self.classify(&content)
    }

    fn classify(&self, content: &str) -> Result<LoadedSnapshot, SnapshotError> {
        let stored: StoredSnapshot =
            serde_json::from_str(content).map_err(|source| self.parse_error(source))?;

        match stored.schema_version {
            None | Some(0) => {
                debug!(path = %self.path.display(), "Snapshot has no schema version");
                Ok(LoadedSnapshot::first())
            }
            Some(version) if version != self.schema_version => {
                warn!(
                    path = %self.path.display(),
                    stored_version = version,
                    expected_version = self.schema_version,
                    "Snapshot schema version mismatch"
                );
                Ok(LoadedSnapshot::version_mismatch())
            }
            Some(_) => {
                let records: Vec<ListingRecord> = if stored.records.is_null() {
                    Vec::new()
                } else {
                    serde_json::from_value(stored.records)
                        .map_err(|source| self.parse_error(source))?
                };
                debug!(path = %self.path.display(), records = records.len(), "Loaded snapshot");
                Ok(LoadedSnapshot::version_match(records))
            }
        }
    }

    /// Replace the stored snapshot with `records` at the current schema version.
    pub async fn save_new(&self, records: &[ListingRecord]) -> Result<(), SnapshotError> {
        let snapshot = Snapshot {
            schema_version: self.schema_version,
            records: records.to_vec(),
        };
        let body = serde_json::to_vec(&snapshot).map_err(SnapshotError::Serialize)?;

        let temp_path = self.temp_path();
        if let Err(source) = tokio::fs::write(&temp_path, &body).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(SnapshotError::Write {
                path: temp_path,
                source,
            });
        }

        if let Err(source) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(SnapshotError::Write {
                path: self.path.clone(),
                source,
            });
        }

        info!(
            path = %self.path.display(),
            records = records.len(),
            schema_version = self.schema_version,
            "Saved snapshot"
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn parse_error(&self, source: serde_json::Error) -> SnapshotError {
        SnapshotError::Parse {
            path: self.path.clone(),
            source,
        }
    }
}
