//! The check job: fetch → normalize ∥ load old snapshot → persist → diff → notify.
//!
//! The new snapshot is always written before any notification goes out, so a crash
//! or failure while notifying never loses it.

use tracing::{info, instrument};

use crate::domains::listings::{find_new, ListingRecord};
use crate::domains::notifications::{self, dispatch, ContactConfig, DispatchReport};
use crate::domains::snapshots::{SnapshotStore, StoredInfoClassification};
use crate::error::{CheckError, FetchError};
use crate::kernel::{extract_listings, JobDeps};

/// Summary of a completed run.
#[derive(Debug)]
pub struct CheckOutcome {
    pub classification: StoredInfoClassification,
    pub fetched: usize,
    pub new_records: usize,
    /// `None` when nothing needed sending
    pub dispatch: Option<DispatchReport>,
}

pub struct CheckJob {
    deps: JobDeps,
    store: SnapshotStore,
    check_url: String,
    contact: ContactConfig,
}

impl CheckJob {
    pub fn new(
        deps: JobDeps,
        store: SnapshotStore,
        check_url: impl Into<String>,
        contact: ContactConfig,
    ) -> Self {
        Self {
            deps,
            store,
            check_url: check_url.into(),
            contact,
        }
    }

    #[instrument(skip(self), fields(check_url = %self.check_url, snapshot = %self.store.path().display()))]
    pub async fn run(&self) -> Result<CheckOutcome, CheckError> {
        let (fetched, stored) = tokio::join!(self.fetch_listings(), self.store.load_old());

        let fetched = fetched.map_err(CheckError::Fetch)?;
        let stored = stored.map_err(CheckError::SnapshotRead)?;

        info!(
            fetched = fetched.len(),
            classification = %stored.classification,
            "Fetched listings and loaded stored snapshot"
        );

        self.store
            .save_new(&fetched)
            .await
            .map_err(CheckError::SnapshotWrite)?;

        let (new_records, notification) = match stored.classification {
            StoredInfoClassification::First => {
                info!("First run, baseline saved without notifying");
                (0, None)
            }
            StoredInfoClassification::VersionMismatch => {
                info!("Stored snapshot has another schema version, sending advisory");
                (0, Some(notifications::version_mismatch(&self.check_url)))
            }
            StoredInfoClassification::VersionMatch => {
                let new = find_new(&stored.records, &fetched);
                info!(new_records = new.len(), "Compared against stored snapshot");
                if new.is_empty() {
                    (0, None)
                } else {
                    (
                        new.len(),
                        Some(notifications::new_listings(&new, &self.check_url)),
                    )
                }
            }
        };

        let report = match notification {
            Some(notification) => Some(
                dispatch(
                    self.deps.mailer.as_ref(),
                    self.deps.sms_sender.as_ref(),
                    &self.contact,
                    &notification,
                )
                .await,
            ),
            None => None,
        };

        Ok(CheckOutcome {
            classification: stored.classification,
            fetched: fetched.len(),
            new_records,
            dispatch: report,
        })
    }

    async fn fetch_listings(&self) -> Result<Vec<ListingRecord>, FetchError> {
        let html = self
            .deps
            .listing_source
            .fetch_raw_listing(&self.check_url)
            .await
            .map_err(|err| FetchError::Source {
                url: self.check_url.clone(),
                // Keep the whole context chain in the diagnostic
                source: format!("{:#}", err).into(),
            })?;

        extract_listings(&html, &self.check_url)
    }
}
