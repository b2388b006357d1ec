//! Fan-message relay: anonymous form submissions forwarded to a chat
//! webhook.

use std::sync::Arc;

use {
    onair_channels::ChannelOutbound,
    serde::Deserialize,
    tracing::info,
};

/// Display name used when the sender leaves the name blank.
pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Message is required")]
    EmptyMessage,
    #[error("Message too long")]
    TooLong,
    #[error("Relay not configured")]
    NotConfigured,
    #[error("Failed to deliver message")]
    Delivery(#[source] anyhow::Error),
}

/// Body of `POST /fan-message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FanMessage {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: String,
}

pub struct FanRelay {
    outbound: Option<Arc<dyn ChannelOutbound>>,
    max_message_len: usize,
    max_name_len: usize,
}

impl FanRelay {
    pub fn new(outbound: Option<Arc<dyn ChannelOutbound>>) -> Self {
        Self {
            outbound,
            max_message_len: 1000,
            max_name_len: 80,
        }
    }

    #[must_use]
    pub fn with_limits(mut self, max_message_len: usize, max_name_len: usize) -> Self {
        self.max_message_len = max_message_len;
        self.max_name_len = max_name_len;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.outbound.is_some()
    }

    /// Validate and render the chat text for a submission.
    pub fn format(&self, msg: &FanMessage) -> Result<String, RelayError> {
        let message = msg.message.trim();
        if message.is_empty() {
            return Err(RelayError::EmptyMessage);
        }
        if message.chars().count() > self.max_message_len {
            return Err(RelayError::TooLong);
        }

        let name: String = msg
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(ANONYMOUS)
            .chars()
            .take(self.max_name_len)
            .collect();

        Ok(format!("💬 **Fan message from {name}**\n{message}"))
    }

    pub async fn relay(&self, msg: &FanMessage) -> Result<(), RelayError> {
        let text = self.format(msg)?;
        let outbound = self.outbound.as_ref().ok_or(RelayError::NotConfigured)?;
        outbound
            .send_text(&text)
            .await
            .map_err(RelayError::Delivery)?;
        info!(sink = outbound.id(), chars = text.chars().count(), "fan message relayed");
        Ok(())
    }
}
