//! Listing element → `ListingRecord`
//!
//! The normalizer only sees elements through [`ElementHandle`], so it works the
//! same for the `scraper` adapter and for hand-built test elements.

use tracing::debug;
use url::Url;

use super::models::ListingRecord;
use crate::kernel::ElementHandle;

/// Each animal on the listings page is one of these.
pub const LISTING_ITEM_SELECTOR: &str = ".list-item";

const PHOTO_SELECTOR: &str = ".list-animal-photo";
const PROFILE_LINK_SELECTOR: &str = ".list-animal-name a";
const NAME_SELECTOR: &str = ".list-animal-name";
const ID_SELECTOR: &str = ".list-animal-id";
const SEX_SELECTOR: &str = ".list-animal-sexSN";
const BREED_SELECTOR: &str = ".list-animal-breed";
const AGE_SELECTOR: &str = ".list-animal-age";
const LOCATION_SELECTOR: &str = ".hidden";

/// Build the canonical record for one listing element.
///
/// Missing sub-elements become `None`; this never fails.
pub fn normalize<E: ElementHandle>(element: &E, check_url: &str) -> ListingRecord {
    let photo = element
        .find(PHOTO_SELECTOR)
        .and_then(|el| el.attribute("src"));
    let profile = element
        .find(PROFILE_LINK_SELECTOR)
        .and_then(|el| el.attribute("href"));

    ListingRecord {
        id: text_of(element, ID_SELECTOR),
        name: text_of(element, NAME_SELECTOR),
        sex: text_of(element, SEX_SELECTOR),
        breed: text_of(element, BREED_SELECTOR),
        age: text_of(element, AGE_SELECTOR),
        location: text_of(element, LOCATION_SELECTOR),
        photo_url: resolve_photo_url(photo.as_deref()),
        profile_url: resolve_profile_url(check_url, profile.as_deref()),
    }
}

fn text_of<E: ElementHandle>(element: &E, selector: &str) -> Option<String> {
    element
        .find(selector)
        .and_then(|el| el.text())
        .map(|text| text.trim().to_string())
}

/// Protocol-relative image URLs get an explicit `https:` scheme.
pub fn resolve_photo_url(photo_url: Option<&str>) -> Option<String> {
    photo_url.map(|url| {
        if url.starts_with("//") {
            format!("https:{}", url)
        } else {
            url.to_string()
        }
    })
}

/// Turn a profile link into an absolute URL based on the page it was found on.
///
/// A root-relative link (`/pet/42`) is joined to the host only. Any other relative
/// link is joined to the directory of `check_url`: the last path segment is
/// dropped whether or not it looks like a file.
pub fn resolve_profile_url(check_url: &str, profile_url: Option<&str>) -> Option<String> {
    let profile_url = profile_url.filter(|url| !url.is_empty())?;

    if is_absolute(profile_url) {
        return Some(profile_url.to_string());
    }

    let base = match Url::parse(check_url) {
        Ok(url) if url.has_host() => url,
        _ => {
            debug!(check_url = %check_url, profile_url = %profile_url, "No absolute base for relative profile URL");
            return None;
        }
    };

    let host = match (base.host_str(), base.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => return None,
    };

    let joined = if profile_url.starts_with('/') {
        join_segments(&[&host, profile_url])
    } else {
        join_segments(&[&host, directory_of(base.path()), profile_url])
    };

    Some(format!("{}://{}", base.scheme(), joined))
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("//") || url.starts_with("http://") || url.starts_with("https://")
}

/// `/shelters/abc/results` → `/shelters/abc`
fn directory_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Join with single slashes at the boundaries, keeping a trailing slash on the last part.
fn join_segments(parts: &[&str]) -> String {
    let last = parts.len().saturating_sub(1);

    parts
        .iter()
        .enumerate()
        .map(|(idx, part)| {
            let part = if idx > 0 {
                part.trim_start_matches('/')
            } else {
                part
            };
            if idx < last {
                part.trim_end_matches('/')
            } else {
                part
            }
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
