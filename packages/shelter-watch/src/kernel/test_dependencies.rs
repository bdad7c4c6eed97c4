// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into a CheckJob for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::{BaseListingSource, BaseMailer, BaseSmsSender, JobDeps};
use crate::domains::notifications::{EmailMessage, SmsCredentials, SmsMessage};

// =============================================================================
// Mock Listing Source
// =============================================================================

pub struct MockListingSource {
    html: Mutex<Option<String>>,
    fetch_calls: Mutex<Vec<String>>,
}

impl MockListingSource {
    pub fn new() -> Self {
        Self {
            html: Mutex::new(Some("<html><body></body></html>".to_string())),
            fetch_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_html(self, html: &str) -> Self {
        *self.html.lock().unwrap() = Some(html.to_string());
        self
    }

    /// Every fetch fails
    pub fn failing(self) -> Self {
        *self.html.lock().unwrap() = None;
        self
    }

    pub fn set_html(&self, html: &str) {
        *self.html.lock().unwrap() = Some(html.to_string());
    }

    pub fn fetch_calls(&self) -> Vec<String> {
        self.fetch_calls.lock().unwrap().clone()
    }
}

impl Default for MockListingSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseListingSource for MockListingSource {
    async fn fetch_raw_listing(&self, url: &str) -> Result<String> {
        self.fetch_calls.lock().unwrap().push(url.to_string());

        match self.html.lock().unwrap().clone() {
            Some(html) => Ok(html),
            None => anyhow::bail!("mock fetch failure for {}", url),
        }
    }
}

// =============================================================================
// Snapshot probe
// =============================================================================

/// Lets a mock sender record what the snapshot file held at the moment it was called.
#[derive(Default)]
struct SnapshotProbe {
    path: Option<PathBuf>,
    observed: Vec<Option<String>>,
}

impl SnapshotProbe {
    fn observe(&mut self) {
        if let Some(path) = &self.path {
            let content = std::fs::read_to_string(path).ok();
            self.observed.push(content);
        }
    }
}

// =============================================================================
// Mock Mailer
// =============================================================================

#[derive(Default)]
pub struct MockMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail: bool,
    probe: Mutex<SnapshotProbe>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the call, then report failure
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn watch_snapshot(self, path: impl Into<PathBuf>) -> Self {
        self.probe.lock().unwrap().path = Some(path.into());
        self
    }

    /// Every message handed to the mailer, including failed ones
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn snapshot_seen_at_send(&self) -> Vec<Option<String>> {
        self.probe.lock().unwrap().observed.clone()
    }
}

#[async_trait]
impl BaseMailer for MockMailer {
    async fn send_email(&self, email: &EmailMessage) -> Result<()> {
        self.probe.lock().unwrap().observe();
        self.sent.lock().unwrap().push(email.clone());

        if self.fail {
            anyhow::bail!("mock mailer failure");
        }
        Ok(())
    }
}

// =============================================================================
// Mock SMS Sender
// =============================================================================

#[derive(Default)]
pub struct MockSmsSender {
    sent: Mutex<Vec<(SmsCredentials, SmsMessage)>>,
    fail_all: bool,
    fail_for: Vec<String>,
    probe: Mutex<SnapshotProbe>,
}

impl MockSmsSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    pub fn failing_for(mut self, recipient: &str) -> Self {
        self.fail_for.push(recipient.to_string());
        self
    }

    pub fn watch_snapshot(self, path: impl Into<PathBuf>) -> Self {
        self.probe.lock().unwrap().path = Some(path.into());
        self
    }

    pub fn sent(&self) -> Vec<SmsMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent().into_iter().map(|message| message.to).collect()
    }

    pub fn credentials_used(&self) -> Vec<SmsCredentials> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(credentials, _)| credentials.clone())
            .collect()
    }

    pub fn snapshot_seen_at_send(&self) -> Vec<Option<String>> {
        self.probe.lock().unwrap().observed.clone()
    }
}

#[async_trait]
impl BaseSmsSender for MockSmsSender {
    async fn send_sms(&self, credentials: &SmsCredentials, sms: &SmsMessage) -> Result<()> {
        self.probe.lock().unwrap().observe();
        self.sent
            .lock()
            .unwrap()
            .push((credentials.clone(), sms.clone()));

        if self.fail_all || self.fail_for.iter().any(|r| r == &sms.to) {
            anyhow::bail!("mock SMS failure for {}", sms.to);
        }
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mock services plus handles to inspect them after a run.
pub struct TestDependencies {
    pub listing_source: Arc<MockListingSource>,
    pub mailer: Arc<MockMailer>,
    pub sms_sender: Arc<MockSmsSender>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            listing_source: Arc::new(MockListingSource::new()),
            mailer: Arc::new(MockMailer::new()),
            sms_sender: Arc::new(MockSmsSender::new()),
        }
    }

    pub fn mock_listing_source(mut self, source: MockListingSource) -> Self {
        self.listing_source = Arc::new(source);
        self
    }

    pub fn mock_mailer(mut self, mailer: MockMailer) -> Self {
        self.mailer = Arc::new(mailer);
        self
    }

    pub fn mock_sms_sender(mut self, sms_sender: MockSmsSender) -> Self {
        self.sms_sender = Arc::new(sms_sender);
        self
    }

    pub fn deps(&self) -> JobDeps {
        JobDeps::new(
            self.listing_source.clone(),
            self.mailer.clone(),
            self.sms_sender.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
