//! Test harness: a temp directory for the snapshot file plus mock dependencies.

use std::path::PathBuf;

use shelter_watch::domains::notifications::ContactConfig;
use shelter_watch::domains::snapshots::{SnapshotStore, SNAPSHOT_SCHEMA_VERSION};
use shelter_watch::kernel::TestDependencies;
use shelter_watch::CheckJob;
use tempfile::TempDir;
use test_context::AsyncTestContext;

use super::CHECK_URL;

pub struct TestHarness {
    pub snapshot_path: PathBuf,
    // Keep the directory alive for the whole test
    _dir: TempDir,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            snapshot_path: dir.path().join("cats.json"),
            _dir: dir,
        }
    }
}

impl TestHarness {
    pub fn store(&self) -> SnapshotStore {
        SnapshotStore::new(self.snapshot_path.clone(), SNAPSHOT_SCHEMA_VERSION)
    }

    pub fn job(&self, deps: &TestDependencies, contact: ContactConfig) -> CheckJob {
        CheckJob::new(deps.deps(), self.store(), CHECK_URL, contact)
    }

    pub async fn write_snapshot(&self, content: &str) {
        tokio::fs::write(&self.snapshot_path, content)
            .await
            .expect("Failed to write snapshot");
    }

    pub async fn read_snapshot(&self) -> serde_json::Value {
        let raw = tokio::fs::read_to_string(&self.snapshot_path)
            .await
            .expect("Failed to read snapshot");
        serde_json::from_str(&raw).expect("Snapshot is not JSON")
    }
}

pub fn full_contact() -> ContactConfig {
    ContactConfig {
        email_from: Some("cats@example.org".to_string()),
        email_to: Some("volunteer@example.org, coordinator@example.org".to_string()),
        sms_from: Some("+15555550000".to_string()),
        sms_to: Some("+15555550001,+15555550002".to_string()),
        account_sid: Some("AC00000000000000000000000000000000".to_string()),
        auth_token: Some("test-token".to_string()),
    }
}
