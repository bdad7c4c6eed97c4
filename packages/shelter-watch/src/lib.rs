// Shelter Watch - listing change notifier
//
// Checks a shelter listings page once per invocation, compares the listed animals
// against the snapshot saved by the previous run, and tells operators about new
// arrivals by email and SMS.
//
// Infrastructure (HTTP, sendmail, Twilio, HTML parsing) sits behind kernel traits;
// the listing/snapshot/notification logic lives in domains/*.

pub mod config;
pub mod domains;
pub mod error;
pub mod kernel;
pub mod pipeline;

pub use config::*;
pub use error::{CheckError, ConfigError, FetchError, NotifyError, SnapshotError};
pub use pipeline::{CheckJob, CheckOutcome};
