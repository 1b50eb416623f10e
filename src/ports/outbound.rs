//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, EmailAddress, MemberRecord, RenderedMessage};

/// Member directory. Read-only source of member records.
#[async_trait::async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Fetch every member. No filtering; that is the resolver's job.
    ///
    /// # Errors
    /// `DomainError::DirectoryUnavailable` when the directory cannot be reached.
    /// An empty list is valid data, not an error.
    async fn list_members(&self) -> Result<Vec<MemberRecord>, DomainError>;
}

/// Mail delivery provider. One call per batch.
#[async_trait::async_trait]
pub trait MailProvider: Send + Sync {
    /// Deliver `message` to every address in `bcc` as blind copies.
    ///
    /// Implementations must never expose a recipient in a visible field; when
    /// the provider demands a "To" recipient it is `sender` itself.
    /// `bcc` never holds more than `MAX_BATCH_SIZE` addresses.
    ///
    /// # Errors
    /// `DomainError::Delivery` (or `Auth`) carrying the provider's error text.
    async fn send_batch(
        &self,
        sender: &EmailAddress,
        bcc: &[EmailAddress],
        message: &RenderedMessage,
    ) -> Result<(), DomainError>;

    /// True when batches are only logged, never delivered.
    fn is_simulated(&self) -> bool {
        false
    }
}
