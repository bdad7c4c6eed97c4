// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Normalizing, diffing and message building are domain functions that use these traits.
//
// Naming convention: Base* for service traits (e.g., BaseMailer, BaseSmsSender)

use anyhow::Result;
use async_trait::async_trait;

use crate::domains::notifications::{EmailMessage, SmsCredentials, SmsMessage};

// =============================================================================
// Element access (Infrastructure - markup tree)
// =============================================================================

/// The only structural access the normalizer needs from a parsed page.
pub trait ElementHandle: Sized {
    fn attribute(&self, name: &str) -> Option<String>;

    /// Full text content, untrimmed
    fn text(&self) -> Option<String>;

    /// First descendant matching a class-based selector such as `.list-animal-name a`
    fn find(&self, selector: &str) -> Option<Self>;
}

// =============================================================================
// Listing Source Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseListingSource: Send + Sync {
    /// Raw markup of the listings page
    async fn fetch_raw_listing(&self, url: &str) -> Result<String>;
}

// =============================================================================
// Mail Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseMailer: Send + Sync {
    async fn send_email(&self, email: &EmailMessage) -> Result<()>;
}

// =============================================================================
// SMS Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseSmsSender: Send + Sync {
    async fn send_sms(&self, credentials: &SmsCredentials, sms: &SmsMessage) -> Result<()>;
}
