//! Member directory adapters. Implement MemberDirectory.
//!
//! REST (production), JSON file (offline), and an unconfigured stand-in that
//! keeps explicit-address sends working when no directory is set up.

pub mod file;
pub mod rest;
pub mod row;

pub use file::JsonFileDirectory;
pub use rest::RestDirectory;

use crate::domain::{DomainError, MemberRecord};
use crate::ports::MemberDirectory;

/// Used when neither a REST directory nor a members file is configured.
/// Group-based sends fail with `DirectoryUnavailable`.
pub struct UnconfiguredDirectory;

#[async_trait::async_trait]
impl MemberDirectory for UnconfiguredDirectory {
    async fn list_members(&self) -> Result<Vec<MemberRecord>, DomainError> {
        Err(DomainError::DirectoryUnavailable(
            "no member directory configured (set MAILER_DIRECTORY_URL/MAILER_DIRECTORY_KEY or MAILER_MEMBERS_FILE)"
                .into(),
        ))
    }
}
