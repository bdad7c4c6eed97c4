use serde::{Deserialize, Serialize};

use crate::domains::listings::ListingRecord;

/// On-disk state: every record seen by the last run plus the schema tag it was written with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub schema_version: u32,
    pub records: Vec<ListingRecord>,
}

/// How the previously stored snapshot relates to this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredInfoClassification {
    /// Nothing usable stored yet; this run only establishes a baseline.
    First,
    /// Stored with a different schema version; its records can't be trusted.
    VersionMismatch,
    VersionMatch,
}

impl std::fmt::Display for StoredInfoClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            StoredInfoClassification::First => "first",
            StoredInfoClassification::VersionMismatch => "version-mismatch",
            StoredInfoClassification::VersionMatch => "version-match",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSnapshot {
    pub classification: StoredInfoClassification,
    /// Only populated for `VersionMatch`.
    pub records: Vec<ListingRecord>,
}

impl LoadedSnapshot {
    pub fn first() -> Self {
        Self {
            classification: StoredInfoClassification::First,
            records: Vec::new(),
        }
    }

    pub fn version_mismatch() -> Self {
        Self {
            classification: StoredInfoClassification::VersionMismatch,
            records: Vec::new(),
        }
    }

    pub fn version_match(records: Vec<ListingRecord>) -> Self {
        Self {
            classification: StoredInfoClassification::VersionMatch,
            records,
        }
    }
}
