//! Dry-run mail provider for development without Graph credentials.
//!
//! Logs what would be sent and reports success. Nothing leaves the machine.

use crate::domain::{DomainError, EmailAddress, RenderedMessage};
use crate::ports::MailProvider;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

#[derive(Default)]
pub struct DryRunMailer {
    batches: AtomicUsize,
}

impl DryRunMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batches "sent" so far.
    #[cfg(test)]
    pub fn batches(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MailProvider for DryRunMailer {
    async fn send_batch(
        &self,
        sender: &EmailAddress,
        bcc: &[EmailAddress],
        message: &RenderedMessage,
    ) -> Result<(), DomainError> {
        let n = self.batches.fetch_add(1, Ordering::SeqCst);
        info!(
            batch = n,
            from = %sender,
            bcc = bcc.len(),
            subject = %message.subject,
            html_len = message.html.len(),
            "[DRY RUN] would send batch"
        );
        Ok(())
    }

    fn is_simulated(&self) -> bool {
        true
    }
}
