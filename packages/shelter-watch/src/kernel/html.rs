//! `scraper`-backed implementation of [`ElementHandle`].

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::traits::ElementHandle;
use crate::domains::listings::{normalize, ListingRecord, LISTING_ITEM_SELECTOR};
use crate::error::FetchError;

#[derive(Debug, Clone, Copy)]
pub struct ScrapedElement<'a>(ElementRef<'a>);

impl<'a> ScrapedElement<'a> {
    pub fn new(element: ElementRef<'a>) -> Self {
        Self(element)
    }
}

impl<'a> ElementHandle for ScrapedElement<'a> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.value().attr(name).map(str::to_string)
    }

    fn text(&self) -> Option<String> {
        Some(self.0.text().collect())
    }

    fn find(&self, selector: &str) -> Option<Self> {
        let selector = match Selector::parse(selector) {
            Ok(s) => s,
            Err(err) => {
                warn!(selector = %selector, error = %err, "Invalid selector");
                return None;
            }
        };
        self.0.select(&selector).next().map(ScrapedElement)
    }
}

/// Parse the listings page and normalize every listing item on it.
///
/// Runs synchronously: `scraper::Html` is not `Send` and must not be held across an await.
pub fn extract_listings(html: &str, check_url: &str) -> Result<Vec<ListingRecord>, FetchError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(LISTING_ITEM_SELECTOR).map_err(|err| FetchError::Parse {
        url: check_url.to_string(),
        reason: err.to_string(),
    })?;

    let records: Vec<ListingRecord> = document
        .select(&selector)
        .map(|element| normalize(&ScrapedElement::new(element), check_url))
        .collect();

    if records.is_empty() {
        warn!(url = %check_url, "No listing items found on page");
    } else {
        debug!(url = %check_url, count = records.len(), "Extracted listings");
    }

    Ok(records)
}
