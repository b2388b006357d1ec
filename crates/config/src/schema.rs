/// Config schema types (server, live control, discord bot, fan relay).
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OnairConfig {
    pub server: ServerConfig,
    pub live: LiveConfig,
    pub discord: DiscordConfig,
    pub relay: RelayConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

/// Live-status control settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Shared secret required as `?key=` on `/live/on` and `/live/off`.
    /// Unset or empty means every control request is accepted.
    pub control_key: Option<String>,

    /// Webhook receiving "on air" / "off air" announcements. Unset or empty
    /// disables announcements.
    pub notify_webhook_url: Option<String>,
}

/// Discord bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    pub bot_token: Option<String>,

    /// Channel where `/live on` and `/live off` are honored (exact name).
    pub control_channel: String,

    /// Base URL of a running gateway. When set, the bot toggles state over
    /// HTTP instead of in-process.
    pub api_base: Option<String>,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            control_channel: "live-control".into(),
            api_base: None,
        }
    }
}

/// Fan-message relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub webhook_url: Option<String>,
    /// Maximum message length, in characters, after trimming.
    pub max_message_len: usize,
    /// Longer names are truncated, not rejected.
    pub max_name_len: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            max_message_len: 1000,
            max_name_len: 80,
        }
    }
}

/// Treat blank optional strings as unset.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl LiveConfig {
    pub fn control_key(&self) -> Option<&str> {
        non_empty(self.control_key.as_deref())
    }

    pub fn notify_webhook_url(&self) -> Option<&str> {
        non_empty(self.notify_webhook_url.as_deref())
    }
}

impl DiscordConfig {
    pub fn bot_token(&self) -> Option<&str> {
        non_empty(self.bot_token.as_deref())
    }

    pub fn api_base(&self) -> Option<&str> {
        non_empty(self.api_base.as_deref())
    }
}

impl RelayConfig {
    pub fn webhook_url(&self) -> Option<&str> {
        non_empty(self.webhook_url.as_deref())
    }
}

impl OnairConfig {
    /// Copy of the config with secrets replaced, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        fn mask(v: &Option<String>) -> Option<String> {
            non_empty(v.as_deref()).map(|_| "[REDACTED]".to_string())
        }
        let mut cfg = self.clone();
        cfg.live.control_key = mask(&self.live.control_key);
        cfg.live.notify_webhook_url = mask(&self.live.notify_webhook_url);
        cfg.discord.bot_token = mask(&self.discord.bot_token);
        cfg.relay.webhook_url = mask(&self.relay.webhook_url);
        cfg
    }
}
