//! Audience rules. Pure functions over a single member, plus the ordered
//! case-insensitive address set the resolver accumulates into.

use crate::domain::{EmailAddress, GroupId, MemberRecord};
use std::collections::{BTreeSet, HashSet};

/// First selected group (in `GroupId` order) that admits this member.
pub fn matching_group(member: &MemberRecord, groups: &BTreeSet<GroupId>) -> Option<GroupId> {
    groups.iter().copied().find(|g| g.admits(member.role))
}

/// "At or above". An undefined rank never satisfies an active threshold.
pub fn meets_threshold(rank: Option<i64>, threshold: Option<i64>) -> bool {
    match (threshold, rank) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(min), Some(rank)) => rank >= min,
    }
}

/// Insertion-ordered set of lower-cased addresses.
#[derive(Debug, Default)]
pub struct AddressSet {
    seen: HashSet<EmailAddress>,
    ordered: Vec<EmailAddress>,
}

impl AddressSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the address was already present.
    pub fn insert(&mut self, address: EmailAddress) -> bool {
        if self.seen.contains(&address) {
            return false;
        }
        self.seen.insert(address.clone());
        self.ordered.push(address);
        true
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn into_vec(self) -> Vec<EmailAddress> {
        self.ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn member(role: Role, rank: Option<i64>) -> MemberRecord {
        MemberRecord {
            email: "m@x.com".into(),
            role,
            certification_tier: None,
            rank,
        }
    }

    #[test]
    fn test_first_match_wins() {
        let groups: BTreeSet<_> = [GroupId::Executives, GroupId::All].into_iter().collect();
        assert_eq!(
            matching_group(&member(Role::Admin, None), &groups),
            Some(GroupId::All)
        );

        let execs: BTreeSet<_> = [GroupId::Officials, GroupId::Executives].into_iter().collect();
        assert_eq!(
            matching_group(&member(Role::Admin, None), &execs),
            Some(GroupId::Executives)
        );
        assert_eq!(matching_group(&member(Role::Public, None), &execs), None);
    }

    #[test]
    fn test_no_groups_matches_nobody() {
        assert_eq!(
            matching_group(&member(Role::Official, None), &BTreeSet::new()),
            None
        );
    }

    #[test]
    fn test_threshold() {
        assert!(meets_threshold(None, None));
        assert!(meets_threshold(Some(10), None));
        assert!(!meets_threshold(None, Some(150)));
        assert!(meets_threshold(Some(150), Some(150)));
        assert!(!meets_threshold(Some(149), Some(150)));
    }

    #[test]
    fn test_address_set_keeps_first_position() {
        let mut set = AddressSet::new();
        assert!(set.insert(EmailAddress::normalized("B@x.com").unwrap()));
        assert!(set.insert(EmailAddress::normalized("a@x.com").unwrap()));
        assert!(!set.insert(EmailAddress::normalized("b@X.COM").unwrap()));
        let out: Vec<String> = set.into_vec().iter().map(ToString::to_string).collect();
        assert_eq!(out, vec!["b@x.com", "a@x.com"]);
    }
}
