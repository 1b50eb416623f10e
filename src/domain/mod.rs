//! Core domain layer. No external I/O dependencies.
//!
//! Entities and audience rules live here. Dependencies flow inward.

pub mod audience;
pub mod entities;
pub mod errors;

pub use audience::{AddressSet, matching_group, meets_threshold};
pub use entities::{
    BatchResult, DispatchOutcome, DispatchRequest, EmailAddress, GroupId, MemberRecord,
    RenderedMessage, ResolvedAudience, Role, parse_rank_threshold,
};
pub use errors::DomainError;
