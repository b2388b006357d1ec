use {anyhow::Result, async_trait::async_trait};

/// A chat message as seen by command handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Set for bots, webhooks and other automated authors.
    pub author_is_bot: bool,
    /// Name of the channel the message was posted in, when it has one
    /// (direct messages don't).
    pub channel_name: Option<String>,
    pub content: String,
}

impl InboundMessage {
    pub fn new(channel_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author_is_bot: false,
            channel_name: Some(channel_name.into()),
            content: content.into(),
        }
    }

    #[must_use]
    pub fn from_bot(mut self) -> Self {
        self.author_is_bot = true;
        self
    }
}

/// Marker attached to a handled command message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckMarker {
    LiveOn,
    LiveOff,
    Failed,
}

impl AckMarker {
    pub fn emoji(self) -> &'static str {
        match self {
            Self::LiveOn => "🔴",
            Self::LiveOff => "⚪",
            Self::Failed => "❌",
        }
    }
}

/// Acknowledge an inbound message on the platform it came from.
#[async_trait]
pub trait MessageAck: Send + Sync {
    async fn ack(&self, marker: AckMarker) -> Result<()>;
}
