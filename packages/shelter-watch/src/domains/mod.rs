// Business domains
pub mod listings;
pub mod notifications;
pub mod snapshots;
