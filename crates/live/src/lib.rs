//! Live status: the on/off broadcast flag and the ways to change it.
//!
//! - [`store::LiveStore`] holds the single [`LiveState`] record.
//! - [`control::ControlGateway`] applies authorized transitions from the
//!   HTTP control surface and announces them.
//! - [`command::ChatCommandHandler`] turns chat messages in the control
//!   channel into transitions through any [`LiveControl`] implementation.

pub mod auth;
pub mod command;
pub mod control;
pub mod store;

pub use {
    command::{ChatCommandHandler, CommandOutcome, LiveCommand, LiveControl},
    control::{ControlError, ControlGateway},
    store::{LiveSource, LiveState, LiveStore},
};
