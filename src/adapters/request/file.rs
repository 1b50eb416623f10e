//! Request documents. The JSON the portal's mail screen posts, read from disk.
//!
//! Accepts the portal field names (`htmlContent`, `recipientGroups`,
//! `customEmails`, `rankFilter`) and the dispatch names as aliases.

use crate::domain::{DispatchRequest, DomainError, GroupId, parse_rank_threshold};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestDocument {
    #[serde(default)]
    subject: String,
    #[serde(default, alias = "bodyFragment")]
    html_content: String,
    #[serde(default, alias = "audienceGroups")]
    recipient_groups: Vec<String>,
    #[serde(default, alias = "explicitAddresses")]
    custom_emails: Vec<String>,
    #[serde(default, alias = "rankThreshold")]
    rank_filter: Option<RankFilter>,
}

/// `200`, `"200+"` or `""`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RankFilter {
    Number(i64),
    Text(String),
}

impl RequestDocument {
    fn into_request(self) -> Result<DispatchRequest, DomainError> {
        let audience_groups = self
            .recipient_groups
            .iter()
            .map(|g| g.parse::<GroupId>())
            .collect::<Result<BTreeSet<_>, _>>()?;

        let rank_threshold = match self.rank_filter {
            None => None,
            Some(RankFilter::Number(n)) => Some(n),
            Some(RankFilter::Text(s)) => parse_rank_threshold(&s)?,
        };

        Ok(DispatchRequest {
            subject: self.subject,
            body_fragment: self.html_content,
            audience_groups,
            rank_threshold,
            explicit_addresses: self.custom_emails,
        })
    }
}

/// Parse a request document. Content checks (blank subject etc.) are left to
/// the dispatch service.
pub fn parse_request(json: &str) -> Result<DispatchRequest, DomainError> {
    let doc: RequestDocument = serde_json::from_str(json)
        .map_err(|e| DomainError::Request(format!("invalid request JSON: {}", e)))?;
    doc.into_request()
}

pub async fn load_request(path: impl AsRef<Path>) -> Result<DispatchRequest, DomainError> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DomainError::Request(format!("read {}: {}", path.display(), e)))?;
    parse_request(&content)
}
