//! Check a shelter listings page once and notify about newly listed animals.
//!
//! Exit codes: 0 success (including failed notification sends), 1 usage or
//! configuration error, 2 listings page unavailable, 3 snapshot unreadable,
//! 4 snapshot not writable.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use shelter_watch::domains::notifications::ContactConfig;
use shelter_watch::domains::snapshots::{SnapshotStore, SNAPSHOT_SCHEMA_VERSION};
use shelter_watch::error::{EXIT_FETCH, EXIT_USAGE};
use shelter_watch::kernel::{source_for, JobDeps, SendmailMailer, TwilioAdapter};
use shelter_watch::{CheckJob, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shelter-watch")]
#[command(about = "Check a shelter listings page and notify about new animals")]
struct Cli {
    /// Snapshot file from the previous run (created if missing)
    snapshot_path: PathBuf,

    /// Listings page URL, or a local HTML file
    check_url: String,

    /// Sender address for email notifications
    email_from: Option<String>,

    /// Comma-separated email recipients
    email_to: Option<String>,

    /// Sending phone number for SMS notifications
    #[arg(long)]
    sms_from: Option<String>,

    /// Comma-separated SMS recipients
    #[arg(long)]
    sms_to: Option<String>,

    /// JSON file with additional contact fields (e.g. Twilio credentials)
    #[arg(long)]
    credentials: Option<PathBuf>,

    #[arg(long)]
    sendmail_path: Option<PathBuf>,
}

impl Cli {
    fn contact(&self) -> ContactConfig {
        ContactConfig {
            email_from: self.email_from.clone(),
            email_to: self.email_to.clone(),
            sms_from: self.sms_from.clone(),
            sms_to: self.sms_to.clone(),
            account_sid: None,
            auth_token: None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,shelter_watch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // clap's own usage exit code would collide with the fetch failure code
            return if err.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let config = Config::from_env();

    let mut contact = ContactConfig::merge(&config.contact, &cli.contact());
    if let Some(path) = cli.credentials.as_ref().or(config.credentials_path.as_ref()) {
        match ContactConfig::from_credentials_file(path).await {
            Ok(file_contact) => contact = ContactConfig::merge(&contact, &file_contact),
            Err(err) => {
                tracing::error!(error = %err, "Failed to load credentials");
                eprintln!("{}", err);
                return ExitCode::from(EXIT_USAGE);
            }
        }
    }

    tracing::info!(
        email = contact.email_channel().is_some(),
        sms = contact.sms_channel().is_some(),
        "Notification channels configured"
    );

    let listing_source = match source_for(&cli.check_url) {
        Ok(source) => source,
        Err(err) => {
            tracing::error!(error = %err, "Failed to set up listing source");
            eprintln!("Something went wrong while reading the provided URL: {:#}", err);
            return ExitCode::from(EXIT_FETCH);
        }
    };

    let sendmail_path = cli.sendmail_path.clone().unwrap_or(config.sendmail_path);
    let deps = JobDeps::new(
        listing_source,
        Arc::new(SendmailMailer::new(sendmail_path)),
        Arc::new(TwilioAdapter::new()),
    );

    let store = SnapshotStore::new(cli.snapshot_path.clone(), SNAPSHOT_SCHEMA_VERSION);
    let job = CheckJob::new(deps, store, cli.check_url.clone(), contact);

    match job.run().await {
        Ok(outcome) => {
            if let Some(report) = &outcome.dispatch {
                for failure in &report.failures {
                    tracing::error!(error = %failure, "Notification could not be delivered");
                }
            }
            tracing::info!(
                classification = %outcome.classification,
                fetched = outcome.fetched,
                new_records = outcome.new_records,
                "Check complete"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Check failed");
            eprintln!("{}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
