//! Toggle the live flag through a gateway running in another process.

use {
    anyhow::{Context, Result, anyhow},
    async_trait::async_trait,
    reqwest::Client,
    secrecy::{ExposeSecret, Secret},
    tracing::debug,
};

use onair_live::{LiveControl, LiveState};

/// Calls `GET {api_base}/live/{on|off}?key=...` on a remote gateway.
///
/// The remote records such changes with the `control-url` source and sends
/// its own announcement.
#[derive(Clone)]
pub struct RemoteLiveControl {
    client: Client,
    api_base: String,
    key: Option<Secret<String>>,
}

impl std::fmt::Debug for RemoteLiveControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteLiveControl")
            .field("api_base", &self.api_base)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl RemoteLiveControl {
    #[must_use]
    pub fn new(api_base: &str, key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            key: key
                .filter(|k| !k.is_empty())
                .map(|k| Secret::new(k.to_string())),
        }
    }
}

#[async_trait]
impl LiveControl for RemoteLiveControl {
    async fn set_live(&self, is_live: bool) -> Result<LiveState> {
        let mode = if is_live { "on" } else { "off" };
        let url = format!("{}/live/{mode}", self.api_base);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.key {
            request = request.query(&[("key", key.expose_secret())]);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("failed to reach live control at {}", self.api_base))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("live control request failed: {status} - {body}"));
        }

        let state: LiveState = response
            .json()
            .await
            .context("failed to parse live control response")?;
        debug!(is_live = state.is_live, source = %state.source, "remote live state set");
        Ok(state)
    }
}
