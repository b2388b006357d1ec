use std::sync::Arc;

use {
    onair_channels::ChannelOutbound,
    tracing::{debug, info, warn},
};

use crate::{
    auth::{AuthMode, ControlAuth},
    store::{LiveSource, LiveState, LiveStore},
};

/// Announcement posted when the stream goes on air.
pub const ON_AIR_TEXT: &str = "🔴 We are now on air!";
/// Announcement posted when the stream goes off air.
pub const OFF_AIR_TEXT: &str = "⚪ We are now off air.";

pub fn announcement_text(is_live: bool) -> &'static str {
    if is_live { ON_AIR_TEXT } else { OFF_AIR_TEXT }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    #[error("Unauthorized")]
    Unauthorized,
}

/// Entry point for every state change. Owns the auth policy and the
/// optional announcement sink; the store is shared with readers.
pub struct ControlGateway {
    store: Arc<LiveStore>,
    auth: ControlAuth,
    announcer: Option<Arc<dyn ChannelOutbound>>,
}

impl ControlGateway {
    /// Gateway in open mode with no announcements.
    pub fn new(store: Arc<LiveStore>) -> Self {
        Self {
            store,
            auth: ControlAuth::resolve(None),
            announcer: None,
        }
    }

    /// Require `key` on HTTP control requests. `None` or empty keeps the
    /// gateway in open mode.
    #[must_use]
    pub fn with_control_key(mut self, key: Option<&str>) -> Self {
        self.auth = ControlAuth::resolve(key);
        self
    }

    #[must_use]
    pub fn with_announcer(mut self, announcer: Arc<dyn ChannelOutbound>) -> Self {
        self.announcer = Some(announcer);
        self
    }

    /// True when HTTP control accepts requests without a key.
    pub fn is_permissive(&self) -> bool {
        self.auth.mode() == AuthMode::Open
    }

    pub fn status(&self) -> LiveState {
        self.store.read()
    }

    /// Handle `/live/on` or `/live/off`: authorize, transition, then submit
    /// the announcement without waiting for it.
    pub fn control_url(&self, is_live: bool, key: Option<&str>) -> Result<LiveState, ControlError> {
        let auth = self.auth.authorize(key);
        if !auth.ok {
            warn!(reason = auth.reason, is_live, "rejected live control request");
            return Err(ControlError::Unauthorized);
        }

        let state = self.store.transition(is_live, LiveSource::ControlUrl);
        info!(is_live, source = %state.source, "live state set");
        self.announce(is_live);
        Ok(state)
    }

    /// Apply a command already accepted by the chat adapter.
    pub fn chat_command(&self, is_live: bool) -> LiveState {
        let state = self.store.transition(is_live, LiveSource::ChatCommand);
        info!(is_live, source = %state.source, "live state set");
        state
    }

    fn announce(&self, is_live: bool) {
        let Some(announcer) = self.announcer.as_ref().map(Arc::clone) else {
            debug!("no announcement sink configured");
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(sink = announcer.id(), is_live, "no async runtime, announcement skipped");
            return;
        };
        runtime.spawn(async move {
            let text = announcement_text(is_live);
            match announcer.send_text(text).await {
                Ok(()) => debug!(sink = announcer.id(), is_live, "announcement delivered"),
                Err(e) => warn!(sink = announcer.id(), error = %e, "announcement failed"),
            }
        });
    }
}
