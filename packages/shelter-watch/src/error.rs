//! Typed errors for the check job.
//!
//! Fatal conditions map to distinct process exit codes so monitoring can tell a
//! changed source page apart from a broken state file. Channel failures are
//! collected into the dispatch report instead of aborting the run.

use std::path::PathBuf;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub const EXIT_USAGE: u8 = 1;
pub const EXIT_FETCH: u8 = 2;
pub const EXIT_SNAPSHOT_READ: u8 = 3;
pub const EXIT_SNAPSHOT_WRITE: u8 = 4;

/// The listings page could not be retrieved or turned into records.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not retrieve {url}: {source}")]
    Source {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("could not parse listings from {url}: {reason}")]
    Parse { url: String, reason: String },
}

/// Reading or writing the persisted snapshot failed.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} does not hold a valid snapshot: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal outcome of a check run.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("something went wrong while reading the listings page: {0}")]
    Fetch(#[source] FetchError),

    #[error("something went wrong while reading the snapshot file: {0}")]
    SnapshotRead(#[source] SnapshotError),

    #[error("something went wrong saving the snapshot file: {0}")]
    SnapshotWrite(#[source] SnapshotError),
}

impl CheckError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CheckError::Fetch(_) => EXIT_FETCH,
            CheckError::SnapshotRead(_) => EXIT_SNAPSHOT_READ,
            CheckError::SnapshotWrite(_) => EXIT_SNAPSHOT_WRITE,
        }
    }
}

/// A single channel send that did not go through.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("email to {recipients} failed: {source}")]
    Email {
        recipients: String,
        #[source]
        source: BoxError,
    },

    #[error("SMS to {recipient} failed: {source}")]
    Sms {
        recipient: String,
        #[source]
        source: BoxError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read credentials file {}: {}", .path.display(), .source)]
    CredentialsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("credentials file {} is malformed: {}", .path.display(), .source)]
    CredentialsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
