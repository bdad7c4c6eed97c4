pub mod models;
pub mod store;

// Re-export commonly used types
pub use models::{LoadedSnapshot, Snapshot, StoredInfoClassification};
pub use store::{SnapshotStore, SNAPSHOT_SCHEMA_VERSION};
