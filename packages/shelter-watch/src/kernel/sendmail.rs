//! Email delivery through the local `sendmail` binary.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::traits::BaseMailer;
use crate::domains::notifications::EmailMessage;

pub struct SendmailMailer {
    program: PathBuf,
}

impl SendmailMailer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl BaseMailer for SendmailMailer {
    async fn send_email(&self, email: &EmailMessage) -> Result<()> {
        debug!(
            program = %self.program.display(),
            recipients = email.to.len(),
            subject = %email.subject,
            "Sending email via sendmail"
        );

        let mut child = Command::new(&self.program)
            .arg("-t")
            .arg("-i")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start {}", self.program.display()))?;

        let mut stdin = child.stdin.take().context("sendmail stdin unavailable")?;
        stdin
            .write_all(render_message(email).as_bytes())
            .await
            .context("Failed to write message to sendmail")?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .context("Failed to wait for sendmail")?;

        if !output.status.success() {
            anyhow::bail!(
                "sendmail exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(())
    }
}

/// RFC 5322 message with an HTML body; `sendmail -t` takes recipients from the headers.
pub fn render_message(email: &EmailMessage) -> String {
    let to: Vec<String> = email.to.iter().map(|addr| header_value(addr)).collect();

    format!(
        "From: {from}\r\nTo: {to}\r\nSubject: {subject}\r\nMIME-Version: 1.0\r\nContent-Type: text/html; charset=utf-8\r\n\r\n{body}\r\n",
        from = header_value(&email.from),
        to = to.join(", "),
        subject = header_value(&email.subject),
        body = email.html,
    )
}

// Strip line breaks so configured values can't inject extra headers.
fn header_value(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}
