//! Microsoft Graph adapter. Implements MailProvider via `users/{sender}/sendMail`.
//!
//! App-only auth (client credentials). The token is cached until shortly before
//! it expires. Every batch goes out with the sender as the only visible
//! recipient and the batch in `bccRecipients`.

use crate::domain::{DomainError, EmailAddress, RenderedMessage};
use crate::ports::MailProvider;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";
/// Refresh this long before the reported expiry.
const TOKEN_SKEW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct GraphCredentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

pub struct GraphMailer {
    client: Client,
    credentials: GraphCredentials,
    /// e.g. `https://login.microsoftonline.com`
    login_base_url: String,
    /// e.g. `https://graph.microsoft.com/v1.0`
    graph_base_url: String,
    save_to_sent_items: bool,
    token: Mutex<Option<CachedToken>>,
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

impl GraphMailer {
    pub fn new(
        credentials: GraphCredentials,
        login_base_url: String,
        graph_base_url: String,
        save_to_sent_items: bool,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            credentials,
            login_base_url: login_base_url.trim_end_matches('/').to_string(),
            graph_base_url: graph_base_url.trim_end_matches('/').to_string(),
            save_to_sent_items,
            token: Mutex::new(None),
        })
    }

    /// Cached token, or a fresh one from the token endpoint.
    async fn access_token(&self) -> Result<String, DomainError> {
        let mut slot = self.token.lock().await;
        if let Some(cached) = slot.as_ref() {
            if Instant::now() < cached.refresh_at {
                return Ok(cached.value.clone());
            }
        }

        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.login_base_url, self.credentials.tenant_id
        );
        debug!(%url, "requesting Graph access token");

        let res = self
            .client
            .post(&url)
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("scope", GRAPH_SCOPE),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(|e| DomainError::Auth(format!("token request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            warn!(status = %status, "Graph token endpoint returned error");
            return Err(DomainError::Auth(format!(
                "failed to get access token ({}): {}",
                status, text
            )));
        }

        let token: TokenResponse = res
            .json()
            .await
            .map_err(|e| DomainError::Auth(format!("unexpected token response: {}", e)))?;

        let lifetime = Duration::from_secs(token.expires_in.unwrap_or(3600));
        *slot = Some(CachedToken {
            value: token.access_token.clone(),
            refresh_at: Instant::now() + lifetime.saturating_sub(TOKEN_SKEW),
        });
        info!(expires_in = lifetime.as_secs(), "Graph access token acquired");

        Ok(token.access_token)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

/// `POST /users/{id}/sendMail` body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMailRequest<'a> {
    message: GraphMessage<'a>,
    save_to_sent_items: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphMessage<'a> {
    subject: &'a str,
    body: GraphBody<'a>,
    from: Recipient<'a>,
    to_recipients: Vec<Recipient<'a>>,
    bcc_recipients: Vec<Recipient<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphBody<'a> {
    content_type: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Recipient<'a> {
    email_address: Address<'a>,
}

#[derive(Serialize)]
struct Address<'a> {
    address: &'a str,
}

impl<'a> Recipient<'a> {
    fn new(address: &'a str) -> Self {
        Self {
            email_address: Address { address },
        }
    }
}

fn send_mail_body<'a>(
    sender: &'a EmailAddress,
    bcc: &'a [EmailAddress],
    message: &'a RenderedMessage,
    save_to_sent_items: bool,
) -> SendMailRequest<'a> {
    SendMailRequest {
        message: GraphMessage {
            subject: &message.subject,
            body: GraphBody {
                content_type: "HTML",
                content: &message.html,
            },
            from: Recipient::new(sender.as_str()),
            to_recipients: vec![Recipient::new(sender.as_str())],
            bcc_recipients: bcc.iter().map(|a| Recipient::new(a.as_str())).collect(),
        },
        save_to_sent_items,
    }
}

#[async_trait::async_trait]
impl MailProvider for GraphMailer {
    async fn send_batch(
        &self,
        sender: &EmailAddress,
        bcc: &[EmailAddress],
        message: &RenderedMessage,
    ) -> Result<(), DomainError> {
        let token = self.access_token().await?;
        let url = format!("{}/users/{}/sendMail", self.graph_base_url, sender);
        let body = send_mail_body(sender, bcc, message, self.save_to_sent_items);

        let res = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Delivery(format!("request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::UNAUTHORIZED {
                // Revoked or rotated secret; next batch fetches a new token.
                *self.token.lock().await = None;
            }
            return Err(DomainError::Delivery(if text.is_empty() {
                status.to_string()
            } else {
                text
            }));
        }

        debug!(recipients = bcc.len(), "sendMail accepted");
        Ok(())
    }
}
