//! Notification bodies for each channel.
//!
//! Text fields scraped from the listing page are HTML-escaped before going into the
//! email. Photo and profile URLs are inserted as-is; escaping them would break the
//! links, so the source page is trusted to hand out well-formed URLs.

use super::models::{EmailContent, Notification};
use crate::domains::listings::ListingRecord;

const NEW_LISTINGS_SUBJECT: &str = "CATS: There are new cats!";
const VERSION_MISMATCH_SUBJECT: &str = "CATS: maybe something changed?";
const VERSION_MISMATCH_TEXT: &str = "The structure of the data used to store cats from previous checks has changed. That might mean there are new cats, or that nothing changed. You'll need to check for yourself.";

const NOUN: &str = "cat";

/// Payloads announcing `records` as newly listed.
pub fn new_listings(records: &[ListingRecord], check_url: &str) -> Notification {
    Notification {
        email: EmailContent {
            subject: NEW_LISTINGS_SUBJECT.to_string(),
            html: listings_html(records),
        },
        sms: listings_sms(records, check_url),
    }
}

/// Fixed advisory sent when the stored snapshot was written by another schema version.
pub fn version_mismatch(check_url: &str) -> Notification {
    Notification {
        email: EmailContent {
            subject: VERSION_MISMATCH_SUBJECT.to_string(),
            html: format!("<p>{}</p>", escape_html(VERSION_MISMATCH_TEXT)),
        },
        sms: format!(
            "Cat check: stored data changed shape, new cats could not be detected this run. Check {}",
            check_url
        ),
    }
}

/// `1 new cat`, `2 new cats`
pub fn pluralize_new(count: usize) -> String {
    let ending = if count == 1 { "" } else { "s" };
    format!("{} new {}{}", count, NOUN, ending)
}

fn listings_html(records: &[ListingRecord]) -> String {
    let blocks: Vec<String> = records.iter().map(record_html).collect();
    format!(
        "<p><i>Found {}</i>:</p>\n\n{}",
        pluralize_new(records.len()),
        blocks.join("\n")
    )
}

fn record_html(record: &ListingRecord) -> String {
    let mut html = String::from("<p>\n");

    if let Some(photo_url) = &record.photo_url {
        let img = format!("<img src='{}' />", photo_url);
        match &record.profile_url {
            Some(profile_url) => html.push_str(&format!("<a href='{}'>{}</a><br />\n", profile_url, img)),
            None => html.push_str(&format!("{}<br />\n", img)),
        }
    }

    if let Some(name) = &record.name {
        let name = escape_html(name);
        match &record.profile_url {
            Some(profile_url) => {
                html.push_str(&format!("<b><a href='{}'>{}</a></b><br />\n", profile_url, name))
            }
            None => html.push_str(&format!("<b>{}</b><br />\n", name)),
        }
    }

    for field in [&record.sex, &record.breed, &record.age].into_iter().flatten() {
        html.push_str(&format!("{}<br />\n", escape_html(field)));
    }

    if let Some(location) = &record.location {
        html.push_str(&format!("<i>{}</i><br />\n", escape_html(location)));
    }

    html.push_str("</p>");
    html
}

fn listings_sms(records: &[ListingRecord], check_url: &str) -> String {
    let mut lines = Vec::with_capacity(records.len() + 2);
    lines.push(format!("Found {}:", pluralize_new(records.len())));
    lines.extend(records.iter().map(record_sms_line));
    lines.push(check_url.to_string());
    lines.join("\n")
}

/// `Whiskers -- Female, 2 years`
fn record_sms_line(record: &ListingRecord) -> String {
    let details: Vec<&str> = [present(&record.sex), present(&record.age)]
        .into_iter()
        .flatten()
        .collect();

    match (present(&record.name), details.is_empty()) {
        (Some(name), true) => name.to_string(),
        (Some(name), false) => format!("{} -- {}", name, details.join(", ")),
        (None, _) => details.join(", "),
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|part| !part.is_empty())
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
