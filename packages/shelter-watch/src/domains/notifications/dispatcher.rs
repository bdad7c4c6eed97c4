//! Fan a notification out to every configured channel.
//!
//! Channels are independent: an unconfigured channel is skipped, and a failing one
//! is recorded in the report while the others still go out. All sends are issued
//! together and the call returns once every one of them has settled.

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::contact::{ContactConfig, SmsChannel};
use super::models::{EmailMessage, Notification, SmsMessage};
use crate::error::NotifyError;
use crate::kernel::{BaseMailer, BaseSmsSender};

#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Sends issued across all channels (one email counts once regardless of recipients)
    pub attempted: usize,
    pub delivered: usize,
    pub failures: Vec<NotifyError>,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, result: Result<(), NotifyError>) {
        self.attempted += 1;
        match result {
            Ok(()) => self.delivered += 1,
            Err(err) => self.failures.push(err),
        }
    }
}

pub async fn dispatch(
    mailer: &dyn BaseMailer,
    sms_sender: &dyn BaseSmsSender,
    contact: &ContactConfig,
    notification: &Notification,
) -> DispatchReport {
    let email = contact.email_channel().map(|channel| EmailMessage {
        from: channel.from,
        to: channel.to,
        subject: notification.email.subject.clone(),
        html: notification.email.html.clone(),
    });
    if email.is_none() {
        debug!("Email channel not configured, skipping");
    }

    let sms_channel = contact.sms_channel();
    if sms_channel.is_none() {
        debug!("SMS channel not configured, skipping");
    }

    let email_send = async {
        match &email {
            Some(message) => Some(send_email(mailer, message).await),
            None => None,
        }
    };
    let sms_sends = join_all(sms_channel.iter().flat_map(|channel| {
        channel
            .to
            .iter()
            .map(move |recipient| send_sms(sms_sender, channel, recipient, &notification.sms))
    }));

    let (email_result, sms_results) = tokio::join!(email_send, sms_sends);

    let mut report = DispatchReport::default();
    if let Some(result) = email_result {
        report.record(result);
    }
    for result in sms_results {
        report.record(result);
    }

    for failure in &report.failures {
        warn!(error = %failure, "Notification send failed");
    }
    info!(
        attempted = report.attempted,
        delivered = report.delivered,
        failed = report.failures.len(),
        "Notifications dispatched"
    );

    report
}

async fn send_email(mailer: &dyn BaseMailer, message: &EmailMessage) -> Result<(), NotifyError> {
    mailer
        .send_email(message)
        .await
        .map_err(|err| NotifyError::Email {
            recipients: message.to.join(", "),
            source: format!("{:#}", err).into(),
        })
}

async fn send_sms(
    sms_sender: &dyn BaseSmsSender,
    channel: &SmsChannel,
    recipient: &str,
    body: &str,
) -> Result<(), NotifyError> {
    let message = SmsMessage {
        from: channel.from.clone(),
        to: recipient.to_string(),
        body: body.to_string(),
    };

    sms_sender
        .send_sms(&channel.credentials, &message)
        .await
        .map_err(|err| NotifyError::Sms {
            recipient: message.to.clone(),
            source: format!("{:#}", err).into(),
        })
}
