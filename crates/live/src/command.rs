//! Chat-command trigger: `/live on` and `/live off` in the control channel.

use std::sync::Arc;

use {
    anyhow::Result,
    async_trait::async_trait,
    onair_channels::{AckMarker, InboundMessage, MessageAck},
    tracing::{debug, info, warn},
};

use crate::{control::ControlGateway, store::LiveState};

/// Something that can flip the live flag on behalf of a chat command.
#[async_trait]
pub trait LiveControl: Send + Sync {
    async fn set_live(&self, is_live: bool) -> Result<LiveState>;
}

#[async_trait]
impl LiveControl for ControlGateway {
    async fn set_live(&self, is_live: bool) -> Result<LiveState> {
        Ok(self.chat_command(is_live))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveCommand {
    On,
    Off,
}

impl LiveCommand {
    /// Match message text, ignoring surrounding whitespace and case.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "/live on" => Some(Self::On),
            "/live off" => Some(Self::Off),
            _ => None,
        }
    }

    pub fn is_live(self) -> bool {
        self == Self::On
    }

    pub fn ack_marker(self) -> AckMarker {
        match self {
            Self::On => AckMarker::LiveOn,
            Self::Off => AckMarker::LiveOff,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Not a command for us; nothing was done and nothing was sent back.
    Ignored,
    Applied(LiveState),
    /// The transition step returned an error.
    Failed,
}

pub struct ChatCommandHandler {
    control: Arc<dyn LiveControl>,
    control_channel: String,
}

impl ChatCommandHandler {
    pub fn new(control: Arc<dyn LiveControl>, control_channel: impl Into<String>) -> Self {
        Self {
            control,
            control_channel: control_channel.into(),
        }
    }

    pub fn control_channel(&self) -> &str {
        &self.control_channel
    }

    /// Filter out bots, other channels and unrelated text.
    pub fn match_command(&self, msg: &InboundMessage) -> Option<LiveCommand> {
        if msg.author_is_bot {
            return None;
        }
        if msg.channel_name.as_deref() != Some(self.control_channel.as_str()) {
            return None;
        }
        LiveCommand::parse(&msg.content)
    }

    /// Apply a matching command and acknowledge it. The acknowledgment is
    /// best-effort: its failure is logged and never changes the outcome.
    pub async fn handle(&self, msg: &InboundMessage, ack: &dyn MessageAck) -> CommandOutcome {
        let Some(command) = self.match_command(msg) else {
            return CommandOutcome::Ignored;
        };

        let (outcome, marker) = match self.control.set_live(command.is_live()).await {
            Ok(state) => {
                info!(command = ?command, source = %state.source, "live command applied");
                (CommandOutcome::Applied(state), command.ack_marker())
            },
            Err(e) => {
                warn!(command = ?command, error = %e, "failed to set live state");
                (CommandOutcome::Failed, AckMarker::Failed)
            },
        };

        match ack.ack(marker).await {
            Ok(()) => debug!(marker = marker.emoji(), "command acknowledged"),
            Err(e) => warn!(error = %e, "acknowledgment failed"),
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::store::LiveStore,
        anyhow::anyhow,
        std::sync::Mutex,
    };

    #[derive(Default)]
    struct RecordingAck {
        markers: Mutex<Vec<AckMarker>>,
        fail: bool,
    }

    impl RecordingAck {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn markers(&self) -> Vec<AckMarker> {
            self.markers.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageAck for RecordingAck {
        async fn ack(&self, marker: AckMarker) -> Result<()> {
            self.markers.lock().unwrap().push(marker);
            if self.fail {
                return Err(anyhow!("missing permissions"));
            }
            Ok(())
        }
    }

    struct BrokenControl;

    #[async_trait]
    impl LiveControl for BrokenControl {
        async fn set_live(&self, _is_live: bool) -> Result<LiveState> {
            Err(anyhow!("gateway unreachable"))
        }
    }

    fn handler() -> (ChatCommandHandler, Arc<LiveStore>) {
        let store = Arc::new(LiveStore::new());
        let gateway = Arc::new(ControlGateway::new(Arc::clone(&store)));
        (ChatCommandHandler::new(gateway, "live-control"), store)
    }

    #[test]
    fn parses_commands_loosely() {
        assert_eq!(LiveCommand::parse("/live on"), Some(LiveCommand::On));
        assert_eq!(LiveCommand::parse("  /Live ON "), Some(LiveCommand::On));
        assert_eq!(LiveCommand::parse("/LIVE off\n"), Some(LiveCommand::Off));
        assert_eq!(LiveCommand::parse("/live"), None);
        assert_eq!(LiveCommand::parse("/live  on"), None);
        assert_eq!(LiveCommand::parse("/live on now"), None);
        assert_eq!(LiveCommand::parse("live on"), None);
    }

    #[tokio::test]
    async fn command_in_control_channel_turns_on() {
        let (handler, store) = handler();
        let ack = RecordingAck::default();

        let outcome = handler
            .handle(&InboundMessage::new("live-control", "/live on"), &ack)
            .await;

        let state = store.read();
        assert!(state.is_live);
        assert_eq!(state.source, "chat-command");
        assert_eq!(outcome, CommandOutcome::Applied(state));
        assert_eq!(ack.markers(), vec![AckMarker::LiveOn]);
    }

    #[tokio::test]
    async fn mixed_case_and_trailing_space_match() {
        let (handler, store) = handler();
        let ack = RecordingAck::default();

        handler
            .handle(&InboundMessage::new("live-control", "/Live ON "), &ack)
            .await;
        assert!(store.read().is_live);

        handler
            .handle(&InboundMessage::new("live-control", " /live OFF"), &ack)
            .await;
        assert!(!store.read().is_live);
        assert_eq!(ack.markers(), vec![AckMarker::LiveOn, AckMarker::LiveOff]);
    }

    #[tokio::test]
    async fn other_channels_are_ignored() {
        let (handler, store) = handler();
        let ack = RecordingAck::default();
        let before = store.read();

        for channel in ["general", "Live-Control", "live-control-2"] {
            let outcome = handler
                .handle(&InboundMessage::new(channel, "/live on"), &ack)
                .await;
            assert_eq!(outcome, CommandOutcome::Ignored);
        }
        let dm = InboundMessage {
            author_is_bot: false,
            channel_name: None,
            content: "/live on".into(),
        };
        assert_eq!(handler.handle(&dm, &ack).await, CommandOutcome::Ignored);

        assert_eq!(store.read(), before);
        assert!(ack.markers().is_empty());
    }

    #[tokio::test]
    async fn bot_messages_are_ignored() {
        let (handler, store) = handler();
        let ack = RecordingAck::default();

        let msg = InboundMessage::new("live-control", "/live on").from_bot();
        assert_eq!(handler.handle(&msg, &ack).await, CommandOutcome::Ignored);
        assert!(!store.read().is_live);
        assert!(ack.markers().is_empty());
    }

    #[tokio::test]
    async fn unrelated_text_gets_no_response() {
        let (handler, store) = handler();
        let ack = RecordingAck::default();

        let msg = InboundMessage::new("live-control", "are we live?");
        assert_eq!(handler.handle(&msg, &ack).await, CommandOutcome::Ignored);
        assert_eq!(store.read().updated_at, None);
        assert!(ack.markers().is_empty());
    }

    #[tokio::test]
    async fn failed_transition_gets_failure_marker() {
        let handler = ChatCommandHandler::new(Arc::new(BrokenControl), "live-control");
        let ack = RecordingAck::default();

        let outcome = handler
            .handle(&InboundMessage::new("live-control", "/live on"), &ack)
            .await;
        assert_eq!(outcome, CommandOutcome::Failed);
        assert_eq!(ack.markers(), vec![AckMarker::Failed]);
    }

    #[tokio::test]
    async fn ack_failure_is_swallowed() {
        let (handler, store) = handler();
        let ack = RecordingAck::failing();

        let outcome = handler
            .handle(&InboundMessage::new("live-control", "/live on"), &ack)
            .await;
        assert!(matches!(outcome, CommandOutcome::Applied(_)));
        assert!(store.read().is_live);
        assert_eq!(ack.markers(), vec![AckMarker::LiveOn]);
    }
}
