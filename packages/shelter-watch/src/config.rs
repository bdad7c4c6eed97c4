use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use crate::domains::notifications::ContactConfig;

const DEFAULT_SENDMAIL_PATH: &str = "/usr/sbin/sendmail";

/// Settings loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Contact fields set in the environment; the lowest-precedence layer
    pub contact: ContactConfig,
    pub sendmail_path: PathBuf,
    pub credentials_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            contact: ContactConfig {
                email_from: lookup("EMAIL_FROM"),
                email_to: lookup("EMAIL_TO"),
                sms_from: lookup("SMS_FROM"),
                sms_to: lookup("SMS_TO"),
                account_sid: lookup("TWILIO_ACCOUNT_SID"),
                auth_token: lookup("TWILIO_AUTH_TOKEN"),
            },
            sendmail_path: lookup("SENDMAIL_PATH")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SENDMAIL_PATH)),
            credentials_path: lookup("SHELTER_WATCH_CREDENTIALS")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        }
    }
}
