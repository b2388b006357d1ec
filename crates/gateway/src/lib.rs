//! Gateway: HTTP surface for live status, live control and the fan-message
//! relay.
//!
//! Lifecycle:
//! 1. Load config (file + environment)
//! 2. Build the live store, control gateway and relay sinks
//! 3. Start the HTTP server (health, live status, live control, relay)
//!
//! State changes go through `onair_live::ControlGateway`; this crate only
//! maps HTTP requests onto it.

pub mod error;
pub mod live;
pub mod relay;
pub mod server;
pub mod state;
