//! Channel adapters shared by the control gateway and the chat bot.
//!
//! Outbound delivery (on-air announcements, fan relay) goes through
//! [`ChannelOutbound`]. Inbound chat messages are reduced to
//! [`InboundMessage`] and acknowledged through [`MessageAck`], so command
//! handling never touches platform types.

pub mod inbound;
pub mod outbound;
pub mod webhook;

pub use {
    inbound::{AckMarker, InboundMessage, MessageAck},
    outbound::ChannelOutbound,
    webhook::WebhookOutbound,
};
