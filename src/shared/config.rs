//! Application configuration. Provider credentials, directory access, sender identity.

use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_SENDER_ADDRESS: &str = "announcements@cboa.ca";
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_LOGIN_BASE_URL: &str = "https://login.microsoftonline.com";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Mail provider (Microsoft Graph)
    // ─────────────────────────────────────────────────────────────────────────
    /// Azure AD tenant. Read from MAILER_GRAPH_TENANT_ID.
    #[serde(default)]
    pub graph_tenant_id: Option<String>,

    /// App registration client id. Read from MAILER_GRAPH_CLIENT_ID.
    #[serde(default)]
    pub graph_client_id: Option<String>,

    /// App registration secret. Read from MAILER_GRAPH_CLIENT_SECRET.
    #[serde(default)]
    pub graph_client_secret: Option<String>,

    #[serde(default)]
    pub graph_base_url: Option<String>,

    #[serde(default)]
    pub login_base_url: Option<String>,

    /// Mailbox the announcements are sent from (and the only visible "To").
    #[serde(default)]
    pub sender_address: Option<String>,

    /// Keep a copy in the sender's Sent Items. Defaults to true.
    #[serde(default)]
    pub save_to_sent_items: Option<bool>,

    // ─────────────────────────────────────────────────────────────────────────
    // Member directory
    // ─────────────────────────────────────────────────────────────────────────
    /// REST project URL. Read from MAILER_DIRECTORY_URL.
    #[serde(default)]
    pub directory_url: Option<String>,

    /// Service key for the directory. Read from MAILER_DIRECTORY_KEY.
    #[serde(default)]
    pub directory_key: Option<String>,

    /// Offline JSON member list, used when no REST directory is configured.
    #[serde(default)]
    pub members_file: Option<String>,

    /// Per-request HTTP timeout (directory and provider).
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Environment (plus `.env`) and the optional `MAILER_CONFIG` file.
    /// A malformed value is an error, never a silent fallback to defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        Self::from_sources(std::env::var("MAILER_CONFIG").ok().as_deref())
    }

    fn from_sources(file: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("MAILER"));
        if let Some(path) = file {
            c = c.add_source(config::File::with_name(path));
        }
        c.build()?.try_deserialize()
    }

    pub fn sender_address_or_default(&self) -> String {
        self.sender_address
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SENDER_ADDRESS.to_string())
    }

    pub fn graph_base_url_or_default(&self) -> String {
        self.graph_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_GRAPH_BASE_URL.to_string())
    }

    pub fn login_base_url_or_default(&self) -> String {
        self.login_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_LOGIN_BASE_URL.to_string())
    }

    pub fn save_to_sent_items_or_default(&self) -> bool {
        self.save_to_sent_items.unwrap_or(true)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS))
    }

    /// Returns true if all three Graph credentials are present.
    pub fn is_graph_configured(&self) -> bool {
        [
            &self.graph_tenant_id,
            &self.graph_client_id,
            &self.graph_client_secret,
        ]
        .iter()
        .all(|v| v.as_deref().is_some_and(|s| !s.is_empty()))
    }

    /// Returns true if the REST directory URL and key are present.
    pub fn is_directory_configured(&self) -> bool {
        self.directory_url.as_deref().is_some_and(|s| !s.is_empty())
            && self.directory_key.as_deref().is_some_and(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.sender_address_or_default(), "announcements@cboa.ca");
        assert_eq!(cfg.graph_base_url_or_default(), DEFAULT_GRAPH_BASE_URL);
        assert!(cfg.save_to_sent_items_or_default());
        assert_eq!(cfg.http_timeout(), Duration::from_secs(30));
        assert!(!cfg.is_graph_configured());
        assert!(!cfg.is_directory_configured());
    }

    #[test]
    fn test_partial_credentials_are_not_configured() {
        let cfg = AppConfig {
            graph_tenant_id: Some("tenant".into()),
            graph_client_id: Some("client".into()),
            graph_client_secret: Some(String::new()),
            directory_url: Some("https://abc.supabase.co".into()),
            ..AppConfig::default()
        };
        assert!(!cfg.is_graph_configured());
        assert!(!cfg.is_directory_configured());
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mailer.toml");
        std::fs::write(
            &path,
            r#"
graph_tenant_id = "t"
graph_client_id = "c"
graph_client_secret = "s"
sender_address = "news@cboa.ca"
save_to_sent_items = false
http_timeout_secs = 5
"#,
        )
        .unwrap();

        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from(path.as_path()))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(cfg.is_graph_configured());
        assert_eq!(cfg.sender_address_or_default(), "news@cboa.ca");
        assert!(!cfg.save_to_sent_items_or_default());
        assert_eq!(cfg.http_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_malformed_value_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mailer.toml");
        std::fs::write(
            &path,
            r#"
graph_tenant_id = "t"
graph_client_id = "c"
graph_client_secret = "s"
http_timeout_secs = "30s"
"#,
        )
        .unwrap();

        let result = AppConfig::from_sources(path.to_str());
        assert!(result.is_err());
    }
}
