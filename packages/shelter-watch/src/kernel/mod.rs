//! Kernel module - infrastructure behind trait seams.

pub mod deps;
pub mod html;
pub mod listing_source;
pub mod sendmail;
pub mod test_dependencies;
pub mod traits;

pub use deps::{JobDeps, TwilioAdapter};
pub use html::{extract_listings, ScrapedElement};
pub use listing_source::{source_for, FileListingSource, HttpListingSource};
pub use sendmail::SendmailMailer;
pub use test_dependencies::TestDependencies;
pub use traits::*;
