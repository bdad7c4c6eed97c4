pub mod contact;
pub mod dispatcher;
pub mod messages;
pub mod models;

// Re-export commonly used types
pub use contact::{ContactConfig, EmailChannel, SmsChannel};
pub use dispatcher::{dispatch, DispatchReport};
pub use messages::{new_listings, version_mismatch};
pub use models::{EmailContent, EmailMessage, Notification, SmsCredentials, SmsMessage};
