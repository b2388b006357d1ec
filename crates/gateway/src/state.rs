use std::sync::Arc;

use {
    onair_channels::{ChannelOutbound, WebhookOutbound},
    onair_config::OnairConfig,
    onair_live::{ControlGateway, LiveStore},
    tracing::{info, warn},
};

use crate::relay::FanRelay;

/// Display name for on/off air announcements.
pub const ANNOUNCE_USERNAME: &str = "On Air";
/// Display name for relayed fan messages.
pub const RELAY_USERNAME: &str = "Fan Mail";

// ── Gateway state ────────────────────────────────────────────────────────────

/// Shared gateway runtime state, wrapped in Arc for use across handlers.
pub struct GatewayState {
    /// Server version string.
    pub version: String,
    /// Live status control; also owns the store.
    pub control: Arc<ControlGateway>,
    pub relay: FanRelay,
}

impl GatewayState {
    pub fn new(control: Arc<ControlGateway>, relay: FanRelay) -> Arc<Self> {
        Arc::new(Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            control,
            relay,
        })
    }

    /// Wire the store, control gateway and webhook sinks from config.
    pub fn from_config(config: &OnairConfig) -> Arc<Self> {
        let store = Arc::new(LiveStore::new());

        let mut control =
            ControlGateway::new(store).with_control_key(config.live.control_key());
        if control.is_permissive() {
            warn!("no live control key configured: /live/on and /live/off accept any request");
        }

        match WebhookOutbound::from_url(config.live.notify_webhook_url()) {
            Some(sink) => {
                let sink = sink.with_username(ANNOUNCE_USERNAME);
                control = control.with_announcer(Arc::new(sink));
                info!("live announcements enabled");
            },
            None => info!("no notify webhook configured, live announcements disabled"),
        }

        let relay_sink = WebhookOutbound::from_url(config.relay.webhook_url()).map(|sink| {
            Arc::new(sink.with_username(RELAY_USERNAME)) as Arc<dyn ChannelOutbound>
        });
        if relay_sink.is_none() {
            warn!("no fan webhook configured, /fan-message will reject submissions");
        }
        let relay = FanRelay::new(relay_sink)
            .with_limits(config.relay.max_message_len, config.relay.max_name_len);

        Self::new(Arc::new(control), relay)
    }
}
