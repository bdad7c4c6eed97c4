mod common;

use common::harness::full_contact;
use common::{TestHarness, CHECK_URL, PAGE_1, PAGE_2};
use shelter_watch::domains::notifications::ContactConfig;
use shelter_watch::domains::snapshots::{SnapshotStore, StoredInfoClassification};
use shelter_watch::error::{EXIT_FETCH, EXIT_SNAPSHOT_READ, EXIT_SNAPSHOT_WRITE};
use shelter_watch::kernel::test_dependencies::{MockListingSource, MockMailer, MockSmsSender};
use shelter_watch::kernel::{source_for, JobDeps, TestDependencies};
use shelter_watch::{CheckError, CheckJob, NotifyError};
use test_context::test_context;

// =============================================================================
// Tests: classification branches
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_first_run_saves_baseline_without_notifying(ctx: &TestHarness) {
    let deps = TestDependencies::new()
        .mock_listing_source(MockListingSource::new().with_html(PAGE_1));

    let outcome = ctx
        .job(&deps, full_contact())
        .run()
        .await
        .expect("Check should succeed");

    assert_eq!(outcome.classification, StoredInfoClassification::First);
    assert_eq!(outcome.fetched, 2);
    assert_eq!(outcome.new_records, 0);
    assert!(outcome.dispatch.is_none());
    assert!(deps.mailer.sent().is_empty());
    assert!(deps.sms_sender.sent().is_empty());
    assert_eq!(deps.listing_source.fetch_calls(), vec![CHECK_URL.to_string()]);

    let snapshot = ctx.read_snapshot().await;
    assert_eq!(snapshot["schemaVersion"], 1);
    assert_eq!(snapshot["records"][0]["id"], "1001");
    assert_eq!(
        snapshot["records"][0]["photoUrl"],
        "https://photos.example.net/1001.jpg"
    );
    assert_eq!(
        snapshot["records"][0]["profileUrl"],
        "https://shelter.example.org/shelters/abc/pet/1001"
    );
    assert_eq!(
        snapshot["records"][1]["profileUrl"],
        "https://shelter.example.org/pet/1002"
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_legacy_snapshot_without_version_is_treated_as_first(ctx: &TestHarness) {
    ctx.write_snapshot(r#"{"version":1,"data":[{"id":"1001"}]}"#)
        .await;
    let deps = TestDependencies::new()
        .mock_listing_source(MockListingSource::new().with_html(PAGE_2));

    let outcome = ctx.job(&deps, full_contact()).run().await.unwrap();

    assert_eq!(outcome.classification, StoredInfoClassification::First);
    assert!(deps.mailer.sent().is_empty());
    assert_eq!(ctx.read_snapshot().await["schemaVersion"], 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_new_listings_are_announced_on_every_channel(ctx: &TestHarness) {
    let deps = TestDependencies::new()
        .mock_listing_source(MockListingSource::new().with_html(PAGE_1));
    ctx.job(&deps, full_contact()).run().await.unwrap();

    deps.listing_source.set_html(PAGE_2);
    let outcome = ctx.job(&deps, full_contact()).run().await.unwrap();

    assert_eq!(outcome.classification, StoredInfoClassification::VersionMatch);
    assert_eq!(outcome.new_records, 1);
    let report = outcome.dispatch.expect("Expected a dispatch");
    assert!(report.is_clean());
    assert_eq!(report.attempted, 3);

    let emails = deps.mailer.sent();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].subject, "CATS: There are new cats!");
    assert_eq!(
        emails[0].to,
        vec!["volunteer@example.org", "coordinator@example.org"]
    );
    assert!(emails[0].html.contains("Found 1 new cat</i>"));
    assert!(emails[0].html.contains("&lt;b&gt;Rex&lt;/b&gt;"));
    assert!(emails[0]
        .html
        .contains("href='https://shelter.example.org/shelters/abc/pet/1003'"));
    // Whiskers changed age and room but is not new
    assert!(!emails[0].html.contains("Whiskers"));

    let mut recipients = deps.sms_sender.recipients();
    recipients.sort();
    assert_eq!(recipients, vec!["+15555550001", "+15555550002"]);
    let sms = &deps.sms_sender.sent()[0];
    assert!(sms.body.starts_with("Found 1 new cat:"));
    assert!(sms.body.contains("<b>Rex</b> -- Male, 4 years"));
    assert!(sms.body.ends_with(CHECK_URL));
    assert!(deps
        .sms_sender
        .credentials_used()
        .iter()
        .all(|c| c.auth_token == "test-token"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_unchanged_listings_send_nothing(ctx: &TestHarness) {
    let deps = TestDependencies::new()
        .mock_listing_source(MockListingSource::new().with_html(PAGE_1));
    ctx.job(&deps, full_contact()).run().await.unwrap();

    let outcome = ctx.job(&deps, full_contact()).run().await.unwrap();

    assert_eq!(outcome.classification, StoredInfoClassification::VersionMatch);
    assert_eq!(outcome.new_records, 0);
    assert!(outcome.dispatch.is_none());
    assert!(deps.mailer.sent().is_empty());
    assert!(deps.sms_sender.sent().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_empty_stored_set_reports_everything_as_new(ctx: &TestHarness) {
    ctx.write_snapshot(r#"{"schemaVersion":1,"records":[]}"#).await;
    let deps = TestDependencies::new()
        .mock_listing_source(MockListingSource::new().with_html(PAGE_1));

    let outcome = ctx.job(&deps, full_contact()).run().await.unwrap();

    assert_eq!(outcome.new_records, 2);
    assert!(deps.mailer.sent()[0].html.contains("Found 2 new cats</i>"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_version_mismatch_sends_advisory(ctx: &TestHarness) {
    ctx.write_snapshot(r#"{"schemaVersion":99,"records":[{"id":"1001"}]}"#)
        .await;
    let deps = TestDependencies::new()
        .mock_listing_source(MockListingSource::new().with_html(PAGE_1));

    let outcome = ctx.job(&deps, full_contact()).run().await.unwrap();

    assert_eq!(
        outcome.classification,
        StoredInfoClassification::VersionMismatch
    );
    assert_eq!(outcome.new_records, 0);

    let emails = deps.mailer.sent();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].subject, "CATS: maybe something changed?");
    assert!(!emails[0].html.contains("Whiskers"));

    let sms = deps.sms_sender.sent();
    assert_eq!(sms.len(), 2);
    assert!(sms.iter().all(|m| m.body.contains(CHECK_URL)));

    // Rewritten at the current version
    let snapshot = ctx.read_snapshot().await;
    assert_eq!(snapshot["schemaVersion"], 1);
    assert_eq!(snapshot["records"].as_array().unwrap().len(), 2);
}

// =============================================================================
// Tests: channel isolation
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_sms_failure_does_not_block_email_or_persistence(ctx: &TestHarness) {
    ctx.write_snapshot(r#"{"schemaVersion":1,"records":[{"id":"1001"}]}"#)
        .await;
    let deps = TestDependencies::new()
        .mock_listing_source(MockListingSource::new().with_html(PAGE_2))
        .mock_mailer(MockMailer::new().watch_snapshot(&ctx.snapshot_path))
        .mock_sms_sender(
            MockSmsSender::new()
                .failing()
                .watch_snapshot(&ctx.snapshot_path),
        );

    let outcome = ctx
        .job(&deps, full_contact())
        .run()
        .await
        .expect("Channel failures must not fail the check");

    let report = outcome.dispatch.unwrap();
    assert_eq!(report.delivered, 1);
    assert_eq!(report.failures.len(), 2);
    assert!(report
        .failures
        .iter()
        .all(|f| matches!(f, NotifyError::Sms { .. })));
    assert_eq!(deps.mailer.sent().len(), 1);

    // The new snapshot was already on disk when each sender ran
    let seen = deps
        .mailer
        .snapshot_seen_at_send()
        .into_iter()
        .chain(deps.sms_sender.snapshot_seen_at_send());
    for content in seen {
        let content = content.expect("Snapshot missing at send time");
        assert!(content.contains("1003"));
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_email_failure_does_not_block_sms(ctx: &TestHarness) {
    ctx.write_snapshot(r#"{"schemaVersion":1,"records":[]}"#).await;
    let deps = TestDependencies::new()
        .mock_listing_source(MockListingSource::new().with_html(PAGE_1))
        .mock_mailer(MockMailer::new().failing());

    let outcome = ctx.job(&deps, full_contact()).run().await.unwrap();

    let report = outcome.dispatch.unwrap();
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0], NotifyError::Email { .. }));
    assert_eq!(deps.sms_sender.sent().len(), 2);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_partially_configured_sms_is_silently_skipped(ctx: &TestHarness) {
    ctx.write_snapshot(r#"{"schemaVersion":1,"records":[]}"#).await;
    let deps = TestDependencies::new()
        .mock_listing_source(MockListingSource::new().with_html(PAGE_1));
    let contact = ContactConfig {
        account_sid: None,
        ..full_contact()
    };

    let outcome = ctx.job(&deps, contact).run().await.unwrap();

    let report = outcome.dispatch.unwrap();
    assert!(report.is_clean());
    assert_eq!(report.attempted, 1);
    assert!(deps.sms_sender.sent().is_empty());
}

// =============================================================================
// Tests: fatal failures
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_fetch_failure_aborts_before_persisting(ctx: &TestHarness) {
    let deps = TestDependencies::new().mock_listing_source(MockListingSource::new().failing());

    let err = ctx.job(&deps, full_contact()).run().await.unwrap_err();

    assert!(matches!(err, CheckError::Fetch(_)));
    assert_eq!(err.exit_code(), EXIT_FETCH);
    assert!(err.to_string().contains(CHECK_URL));
    assert!(!ctx.snapshot_path.exists());
    assert!(deps.mailer.sent().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_fetch_failure_reports_underlying_cause(ctx: &TestHarness) {
    let page = ctx.snapshot_path.with_file_name("missing.html");
    let page = page.to_str().unwrap();
    let io_cause = std::fs::read_to_string(page).unwrap_err().to_string();
    let mocks = TestDependencies::new();
    let deps = JobDeps::new(
        source_for(page).unwrap(),
        mocks.mailer.clone(),
        mocks.sms_sender.clone(),
    );
    let job = CheckJob::new(deps, ctx.store(), page, full_contact());

    let err = job.run().await.unwrap_err();

    assert_eq!(err.exit_code(), EXIT_FETCH);
    let message = err.to_string();
    assert!(message.contains(page));
    assert!(message.contains(&io_cause), "cause missing from: {}", message);
    assert!(!ctx.snapshot_path.exists());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_corrupt_snapshot_aborts_and_is_left_alone(ctx: &TestHarness) {
    ctx.write_snapshot("{ this is not json").await;
    let deps = TestDependencies::new()
        .mock_listing_source(MockListingSource::new().with_html(PAGE_1));

    let err = ctx.job(&deps, full_contact()).run().await.unwrap_err();

    assert!(matches!(err, CheckError::SnapshotRead(_)));
    assert_eq!(err.exit_code(), EXIT_SNAPSHOT_READ);
    let raw = tokio::fs::read_to_string(&ctx.snapshot_path).await.unwrap();
    assert_eq!(raw, "{ this is not json");
    assert!(deps.mailer.sent().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_unwritable_snapshot_aborts_before_notifying(ctx: &TestHarness) {
    let deps = TestDependencies::new()
        .mock_listing_source(MockListingSource::new().with_html(PAGE_1));
    let missing_dir = ctx
        .snapshot_path
        .parent()
        .unwrap()
        .join("missing")
        .join("cats.json");
    let job = CheckJob::new(
        deps.deps(),
        SnapshotStore::new(missing_dir, 1),
        CHECK_URL,
        full_contact(),
    );

    let err = job.run().await.unwrap_err();

    assert!(matches!(err, CheckError::SnapshotWrite(_)));
    assert_eq!(err.exit_code(), EXIT_SNAPSHOT_WRITE);
    assert!(deps.mailer.sent().is_empty());
}

// =============================================================================
// Tests: local listing pages
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_local_page_is_read_from_disk(ctx: &TestHarness) {
    let page = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/listings_page1.html");
    let mocks = TestDependencies::new();
    let deps = JobDeps::new(
        source_for(page).unwrap(),
        mocks.mailer.clone(),
        mocks.sms_sender.clone(),
    );
    let job = CheckJob::new(deps, ctx.store(), page, full_contact());

    let outcome = job.run().await.unwrap();

    assert_eq!(outcome.fetched, 2);
    let snapshot = ctx.read_snapshot().await;
    // No absolute base to resolve relative profile links against
    assert!(snapshot["records"][0]["profileUrl"].is_null());
    assert_eq!(
        snapshot["records"][0]["photoUrl"],
        "https://photos.example.net/1001.jpg"
    );
}
