//! REST member directory. Implements MemberDirectory against the portal's
//! PostgREST `members` table.

use crate::adapters::directory::row::parse_rows;
use crate::domain::{DomainError, MemberRecord};
use crate::ports::MemberDirectory;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

const MEMBER_COLUMNS: &str = "email,role,certification_level,rank";

/// Reads `/rest/v1/members` with the service key.
pub struct RestDirectory {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestDirectory {
    /// # Arguments
    /// * `base_url` - Project URL, e.g. `https://abc.supabase.co` (no trailing path)
    /// * `api_key` - Service role key; sent as both `apikey` and bearer token
    /// * `timeout` - Whole-request timeout
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait::async_trait]
impl MemberDirectory for RestDirectory {
    async fn list_members(&self) -> Result<Vec<MemberRecord>, DomainError> {
        let url = format!("{}/rest/v1/members", self.base_url);
        debug!(%url, "fetching members");

        let res = self
            .client
            .get(&url)
            .query(&[("select", MEMBER_COLUMNS)])
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| DomainError::DirectoryUnavailable(format!("request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "member directory returned error");
            return Err(DomainError::DirectoryUnavailable(format!(
                "directory error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let body = res
            .text()
            .await
            .map_err(|e| DomainError::DirectoryUnavailable(format!("read body: {}", e)))?;
        let members = parse_rows(&body).map_err(|e| {
            DomainError::DirectoryUnavailable(format!("unexpected member payload: {}", e))
        })?;

        debug!(count = members.len(), "members fetched");
        Ok(members)
    }
}
