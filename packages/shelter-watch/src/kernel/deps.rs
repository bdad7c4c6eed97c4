//! Job dependencies (using traits for testability)
//!
//! The check job only talks to the outside world through these trait objects, so
//! tests can swap in the mocks from `test_dependencies`.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use twilio::{TwilioOptions, TwilioService};

use crate::domains::notifications::{SmsCredentials, SmsMessage};
use crate::kernel::{BaseListingSource, BaseMailer, BaseSmsSender};

// =============================================================================
// TwilioService Adapter (implements BaseSmsSender trait)
// =============================================================================

/// Sends SMS through Twilio; credentials arrive with each send because they come
/// from the merged contact config rather than process-wide settings.
pub struct TwilioAdapter {
    client: reqwest::Client,
}

impl TwilioAdapter {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for TwilioAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseSmsSender for TwilioAdapter {
    async fn send_sms(&self, credentials: &SmsCredentials, sms: &SmsMessage) -> Result<()> {
        let service = TwilioService::with_client(
            TwilioOptions {
                account_sid: credentials.account_sid.clone(),
                auth_token: credentials.auth_token.clone(),
            },
            self.client.clone(),
        );

        let message = service
            .send_sms(&sms.from, &sms.to, &sms.body)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        debug!(sid = %message.sid, status = %message.status, "SMS accepted by Twilio");
        Ok(())
    }
}

// =============================================================================
// JobDeps
// =============================================================================

#[derive(Clone)]
pub struct JobDeps {
    pub listing_source: Arc<dyn BaseListingSource>,
    pub mailer: Arc<dyn BaseMailer>,
    pub sms_sender: Arc<dyn BaseSmsSender>,
}

impl JobDeps {
    pub fn new(
        listing_source: Arc<dyn BaseListingSource>,
        mailer: Arc<dyn BaseMailer>,
        sms_sender: Arc<dyn BaseSmsSender>,
    ) -> Self {
        Self {
            listing_source,
            mailer,
            sms_sender,
        }
    }
}
