//! Audience resolution: groups + rank threshold + explicit addresses -> one
//! deduplicated, lower-cased recipient list.
//!
//! - Explicit addresses seed the set (malformed ones are dropped)
//! - No groups selected: the directory is never consulted
//! - Otherwise one `list_members` call per resolution; nothing is cached

use crate::domain::{
    AddressSet, DomainError, EmailAddress, GroupId, ResolvedAudience, matching_group,
    meets_threshold,
};
use crate::ports::MemberDirectory;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

pub struct AudienceResolver {
    directory: Arc<dyn MemberDirectory>,
}

impl AudienceResolver {
    pub fn new(directory: Arc<dyn MemberDirectory>) -> Self {
        Self { directory }
    }

    /// Resolve an audience. Explicit addresses come first (entry order), then
    /// directory matches (directory order).
    ///
    /// # Errors
    /// `DirectoryUnavailable` only when `groups` is non-empty and the directory fails.
    pub async fn resolve(
        &self,
        groups: &BTreeSet<GroupId>,
        rank_threshold: Option<i64>,
        explicit_addresses: &[String],
    ) -> Result<ResolvedAudience, DomainError> {
        let mut set = AddressSet::new();

        for raw in explicit_addresses {
            match EmailAddress::parse(raw) {
                Some(address) => {
                    set.insert(address);
                }
                None => debug!(address = %raw, "dropping malformed explicit address"),
            }
        }
        let explicit = set.len();

        if groups.is_empty() {
            debug!(explicit, "no groups selected; skipping directory");
            return Ok(ResolvedAudience {
                addresses: set.into_vec(),
            });
        }

        let members = self.directory.list_members().await?;
        let fetched = members.len();
        let mut matched = 0usize;

        for member in &members {
            if matching_group(member, groups).is_none() {
                continue;
            }
            if !meets_threshold(member.rank, rank_threshold) {
                continue;
            }
            let Some(address) = EmailAddress::normalized(&member.email) else {
                continue;
            };
            matched += 1;
            set.insert(address);
        }

        info!(
            groups = ?groups,
            rank_threshold,
            explicit,
            fetched,
            matched,
            total = set.len(),
            "audience resolved"
        );

        Ok(ResolvedAudience {
            addresses: set.into_vec(),
        })
    }
}
