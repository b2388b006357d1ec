use {anyhow::Result, async_trait::async_trait};

/// Send messages to an external channel.
#[async_trait]
pub trait ChannelOutbound: Send + Sync {
    /// Sink identifier used in log fields (e.g. "webhook").
    fn id(&self) -> &str;

    async fn send_text(&self, text: &str) -> Result<()>;
}
