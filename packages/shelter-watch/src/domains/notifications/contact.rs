//! Notification destinations and provider credentials.
//!
//! Settings arrive from several places (environment, command line, an optional
//! credentials file) and are layered with [`ContactConfig::merge`]. A channel only
//! counts as configured when every field it needs is present and non-empty.

use std::path::Path;

use serde::Deserialize;

use super::models::SmsCredentials;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactConfig {
    pub email_from: Option<String>,
    /// Comma-separated addresses
    pub email_to: Option<String>,
    pub sms_from: Option<String>,
    /// Comma-separated phone numbers
    pub sms_to: Option<String>,
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailChannel {
    pub from: String,
    pub to: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsChannel {
    pub credentials: SmsCredentials,
    pub from: String,
    pub to: Vec<String>,
}

impl ContactConfig {
    /// Field-by-field overlay: a present, non-empty value in `overrides` wins.
    pub fn merge(base: &ContactConfig, overrides: &ContactConfig) -> ContactConfig {
        fn pick(base: &Option<String>, over: &Option<String>) -> Option<String> {
            present(over).or_else(|| present(base)).map(str::to_string)
        }

        ContactConfig {
            email_from: pick(&base.email_from, &overrides.email_from),
            email_to: pick(&base.email_to, &overrides.email_to),
            sms_from: pick(&base.sms_from, &overrides.sms_from),
            sms_to: pick(&base.sms_to, &overrides.sms_to),
            account_sid: pick(&base.account_sid, &overrides.account_sid),
            auth_token: pick(&base.auth_token, &overrides.auth_token),
        }
    }

    /// Read a JSON credentials file holding any subset of the contact fields.
    pub async fn from_credentials_file(path: &Path) -> Result<ContactConfig, ConfigError> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::CredentialsRead {
                    path: path.to_path_buf(),
                    source,
                })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::CredentialsParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn email_channel(&self) -> Option<EmailChannel> {
        let from = present(&self.email_from)?;
        let to = split_list(present(&self.email_to)?);
        if to.is_empty() {
            return None;
        }

        Some(EmailChannel {
            from: from.to_string(),
            to,
        })
    }

    pub fn sms_channel(&self) -> Option<SmsChannel> {
        let account_sid = present(&self.account_sid)?;
        let auth_token = present(&self.auth_token)?;
        let from = present(&self.sms_from)?;
        let to = split_list(present(&self.sms_to)?);
        if to.is_empty() {
            return None;
        }

        Some(SmsChannel {
            credentials: SmsCredentials {
                account_sid: account_sid.to_string(),
                auth_token: auth_token.to_string(),
            },
            from: from.to_string(),
            to,
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
