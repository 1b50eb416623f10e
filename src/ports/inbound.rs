//! Inbound port. UI (adapter) calls into the application.

use crate::domain::{DispatchOutcome, DomainError};

/// Input port: UI/CLI invokes the dispatch use case.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Run the interactive compose flow. Returns `None` when the author cancels.
    async fn run(&self) -> Result<Option<DispatchOutcome>, DomainError>;
}
