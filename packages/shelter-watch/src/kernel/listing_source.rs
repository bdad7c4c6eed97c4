//! Listing page sources
//!
//! - `HttpListingSource` fetches the page over HTTP(S) with reqwest
//! - `FileListingSource` reads a saved page from disk, for trying the job against
//!   example pages

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use super::traits::BaseListingSource;

pub struct HttpListingSource {
    client: reqwest::Client,
}

impl HttpListingSource {
    pub fn new() -> Result<Self> {
        // Some shelter platforms reject requests without a browser-like User-Agent
        let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US,en;q=0.5"),
        );

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl BaseListingSource for HttpListingSource {
    async fn fetch_raw_listing(&self, url: &str) -> Result<String> {
        debug!(url = %url, "Fetching listings page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }
}

/// Reads the check target as a local file (`file://` prefix optional).
#[derive(Debug, Default)]
pub struct FileListingSource;

#[async_trait]
impl BaseListingSource for FileListingSource {
    async fn fetch_raw_listing(&self, url: &str) -> Result<String> {
        let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
        debug!(path = %path.display(), "Reading listings page from disk");

        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}

pub fn is_remote(check_url: &str) -> bool {
    check_url.starts_with("http://") || check_url.starts_with("https://")
}

/// Pick the source matching the check target.
pub fn source_for(check_url: &str) -> Result<Arc<dyn BaseListingSource>> {
    if is_remote(check_url) {
        Ok(Arc::new(HttpListingSource::new()?))
    } else {
        Ok(Arc::new(FileListingSource))
    }
}
