//! Discord-compatible incoming webhook sink.
//!
//! Posts `{"content": ...}` to a fixed URL. Mentions are disabled through
//! `allowed_mentions`, so relayed text can never ping roles or `@everyone`.

use {
    anyhow::{Context, Result, anyhow},
    async_trait::async_trait,
    reqwest::Client,
    secrecy::{ExposeSecret, Secret},
    serde::Serialize,
};

use crate::outbound::ChannelOutbound;

/// Webhook-backed outbound channel. The URL embeds a token, so it is kept
/// behind [`Secret`].
#[derive(Clone)]
pub struct WebhookOutbound {
    client: Client,
    url: Secret<String>,
    username: Option<String>,
}

impl std::fmt::Debug for WebhookOutbound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookOutbound")
            .field("url", &"[REDACTED]")
            .field("username", &self.username)
            .finish()
    }
}

impl WebhookOutbound {
    #[must_use]
    pub fn new(url: Secret<String>) -> Self {
        Self {
            client: Client::new(),
            url,
            username: None,
        }
    }

    /// Build a sink from an optional configured URL. Missing or blank
    /// values disable the sink.
    pub fn from_url(url: Option<&str>) -> Option<Self> {
        let url = url.map(str::trim).filter(|u| !u.is_empty())?;
        Some(Self::new(Secret::new(url.to_string())))
    }

    /// Override the display name the webhook posts under.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    allowed_mentions: AllowedMentions,
}

#[derive(Serialize)]
struct AllowedMentions {
    parse: [&'static str; 0],
}

#[async_trait]
impl ChannelOutbound for WebhookOutbound {
    fn id(&self) -> &str {
        "webhook"
    }

    async fn send_text(&self, text: &str) -> Result<()> {
        let payload = WebhookPayload {
            content: text,
            username: self.username.as_deref(),
            allowed_mentions: AllowedMentions { parse: [] },
        };

        let response = self
            .client
            .post(self.url.expose_secret())
            .json(&payload)
            .send()
            .await
            .context("failed to send webhook request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("webhook delivery failed: {status} - {body}"));
        }

        tracing::debug!(status = %response.status(), "webhook delivered");
        Ok(())
    }
}
