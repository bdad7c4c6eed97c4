pub mod diff;
pub mod models;
pub mod normalizer;

// Re-export commonly used types
pub use diff::find_new;
pub use models::ListingRecord;
pub use normalizer::{normalize, resolve_photo_url, resolve_profile_url, LISTING_ITEM_SELECTOR};
