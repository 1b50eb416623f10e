//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Request-shape problem detected before any I/O, or an audience that
    /// resolved to nobody. Never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Member directory could not be reached (or answered garbage) while
    /// group-based resolution was required.
    #[error("Member directory unavailable: {0}")]
    DirectoryUnavailable(String),

    /// Mail provider rejected or never received a batch. Carries the
    /// provider's own error text.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Provider credential exchange failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Malformed request input (request file, address import, prompts).
    #[error("Invalid request input: {0}")]
    Request(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    /// Underlying message without the category prefix.
    ///
    /// Batch results record this so the provider's text survives verbatim.
    pub fn into_detail(self) -> String {
        match self {
            DomainError::Validation(s)
            | DomainError::DirectoryUnavailable(s)
            | DomainError::Delivery(s)
            | DomainError::Auth(s)
            | DomainError::Request(s)
            | DomainError::Config(s) => s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_strips_prefix() {
        let e = DomainError::Delivery("ErrorExceededMessageLimit".into());
        assert_eq!(e.to_string(), "Delivery failed: ErrorExceededMessageLimit");
        assert_eq!(e.into_detail(), "ErrorExceededMessageLimit");
    }
}
