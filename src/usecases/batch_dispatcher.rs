//! Batched delivery: split a resolved audience into provider-legal chunks and
//! submit them one after another.
//!
//! A failed batch is recorded and skipped past, never fatal.

use crate::domain::{BatchResult, EmailAddress, RenderedMessage};
use crate::ports::MailProvider;
use std::sync::Arc;
use tracing::{info, warn};

/// Provider ceiling on recipients per call.
pub const MAX_BATCH_SIZE: usize = 500;

/// Consecutive batches of at most `MAX_BATCH_SIZE`, in input order.
pub fn partition(addresses: &[EmailAddress]) -> impl Iterator<Item = &[EmailAddress]> {
    addresses.chunks(MAX_BATCH_SIZE)
}

pub struct BatchDispatcher {
    provider: Arc<dyn MailProvider>,
    sender: EmailAddress,
}

impl BatchDispatcher {
    pub fn new(provider: Arc<dyn MailProvider>, sender: EmailAddress) -> Self {
        Self { provider, sender }
    }

    pub fn sender(&self) -> &EmailAddress {
        &self.sender
    }

    pub fn is_simulated(&self) -> bool {
        self.provider.is_simulated()
    }

    /// Submit every batch sequentially. Batch `i` finishes before `i + 1` starts.
    pub async fn dispatch(
        &self,
        addresses: &[EmailAddress],
        message: &RenderedMessage,
    ) -> Vec<BatchResult> {
        let total = addresses.len().div_ceil(MAX_BATCH_SIZE);
        let mut results = Vec::with_capacity(total);

        for (batch_index, batch) in partition(addresses).enumerate() {
            let outcome = self
                .provider
                .send_batch(&self.sender, batch, message)
                .await;

            let result = match outcome {
                Ok(()) => {
                    info!(batch = batch_index, of = total, size = batch.len(), "batch sent");
                    BatchResult {
                        batch_index,
                        size: batch.len(),
                        succeeded: true,
                        error: None,
                    }
                }
                Err(e) => {
                    warn!(batch = batch_index, of = total, size = batch.len(), error = %e, "batch failed; continuing");
                    BatchResult {
                        batch_index,
                        size: batch.len(),
                        succeeded: false,
                        error: Some(e.into_detail()),
                    }
                }
            };
            results.push(result);
        }

        results
    }
}
