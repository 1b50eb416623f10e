//! Domain entities. Pure data structures for the dispatch core.
//!
//! No HTTP/provider types here; adapters map into these.

use crate::domain::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Lower-cased destination address.
///
/// Two constructors: `parse` applies the basic `local@domain.tld` shape check
/// (author-supplied input), `normalized` only trims and lower-cases (directory
/// records, which are trusted).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: &str) -> Option<Self> {
        let candidate = raw.trim();
        if has_email_shape(candidate) {
            Some(Self(candidate.to_lowercase()))
        } else {
            None
        }
    }

    /// Returns `None` for blank input.
    pub fn normalized(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_lowercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// `[^\s@]+@[^\s@]+\.[^\s@]+`, anchored.
fn has_email_shape(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    let clean = |part: &str| !part.is_empty() && !part.chars().any(|c| c == '@' || c.is_whitespace());
    if !clean(local) || !clean(domain) {
        return false;
    }
    let last = domain.len() - 1;
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < last)
}

/// Fixed audience categories. Declaration order is evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupId {
    All,
    Officials,
    Executives,
}

impl GroupId {
    pub const ALL: [GroupId; 3] = [GroupId::All, GroupId::Officials, GroupId::Executives];

    pub fn as_str(self) -> &'static str {
        match self {
            GroupId::All => "all",
            GroupId::Officials => "officials",
            GroupId::Executives => "executives",
        }
    }

    /// Human label for pickers.
    pub fn label(self) -> &'static str {
        match self {
            GroupId::All => "All Members",
            GroupId::Officials => "All Officials",
            GroupId::Executives => "All Executives",
        }
    }

    /// Membership test for a single role.
    pub fn admits(self, role: Role) -> bool {
        match self {
            GroupId::All => true,
            GroupId::Officials => role == Role::Official,
            GroupId::Executives => matches!(role, Role::Executive | Role::Admin),
        }
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(GroupId::All),
            "officials" => Ok(GroupId::Officials),
            "executives" => Ok(GroupId::Executives),
            other => Err(DomainError::Validation(format!(
                "unknown recipient group: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Public,
    Official,
    Executive,
    Admin,
}

impl Role {
    /// Directory role string to role. Anything unrecognised is `Public`.
    pub fn from_directory(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("official") => Role::Official,
            Some("executive") => Role::Executive,
            Some("admin") => Role::Admin,
            _ => Role::Public,
        }
    }
}

/// One member as reported by the directory. Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub email: String,
    pub role: Role,
    pub certification_tier: Option<String>,
    pub rank: Option<i64>,
}

/// Input to one send operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchRequest {
    pub subject: String,
    /// HTML fragment, no surrounding document.
    pub body_fragment: String,
    pub audience_groups: BTreeSet<GroupId>,
    /// Restricts group-selected members only; never explicit addresses.
    pub rank_threshold: Option<i64>,
    /// Raw author input, in entry order. Shape-checked during resolution.
    pub explicit_addresses: Vec<String>,
}

impl DispatchRequest {
    pub fn new(subject: impl Into<String>, body_fragment: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body_fragment: body_fragment.into(),
            ..Self::default()
        }
    }

    pub fn with_group(mut self, group: GroupId) -> Self {
        self.audience_groups.insert(group);
        self
    }

    pub fn with_rank_threshold(mut self, threshold: i64) -> Self {
        self.rank_threshold = Some(threshold);
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.explicit_addresses.push(address.into());
        self
    }

    /// Whether any recipient source was selected at all.
    pub fn has_audience(&self) -> bool {
        !self.audience_groups.is_empty() || !self.explicit_addresses.is_empty()
    }
}

/// Parse the picker form of a rank threshold: `"200+"`, `"200"`, or blank.
pub fn parse_rank_threshold(raw: &str) -> Result<Option<i64>, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let digits = trimmed.strip_suffix('+').unwrap_or(trimmed).trim();
    digits
        .parse::<i64>()
        .map(Some)
        .map_err(|_| DomainError::Validation(format!("invalid rank filter: {raw}")))
}

/// Deduplicated, lower-cased destinations for one dispatch. Never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAudience {
    pub addresses: Vec<EmailAddress>,
}

impl ResolvedAudience {
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// Provider-ready document. Carries no recipient information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub batch_index: usize,
    pub size: usize,
    pub succeeded: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub recipient_count: usize,
    pub batch_results: Vec<BatchResult>,
    pub overall_succeeded: bool,
    /// Batches went to a simulated provider; nothing was delivered.
    pub dry_run: bool,
}

impl DispatchOutcome {
    pub fn new(recipient_count: usize, batch_results: Vec<BatchResult>) -> Self {
        let overall_succeeded = batch_results.iter().all(|b| b.succeeded);
        Self {
            recipient_count,
            batch_results,
            overall_succeeded,
            dry_run: false,
        }
    }

    /// Mark the outcome as produced by a simulated provider.
    pub fn simulated(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn failed_batches(&self) -> usize {
        self.batch_results.iter().filter(|b| !b.succeeded).count()
    }

    /// One-line report for the author: plain success, or the partial-delivery warning.
    pub fn summary(&self) -> String {
        if self.dry_run {
            format!(
                "[DRY RUN] Nothing delivered; would have sent to {} recipients in {} batches",
                self.recipient_count,
                self.batch_results.len()
            )
        } else if self.overall_succeeded {
            format!(
                "Email sent successfully to {} recipients",
                self.recipient_count
            )
        } else {
            format!(
                "Sent to {} recipients, but {} of {} batches failed",
                self.recipient_count,
                self.failed_batches(),
                self.batch_results.len()
            )
        }
    }
}
