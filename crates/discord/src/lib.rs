//! Discord bot: listens for `/live on` and `/live off` in the control
//! channel and reacts to the command message with the result.

pub mod bot;
pub mod remote;

pub use {
    bot::{LiveBotHandler, run_bot},
    remote::RemoteLiveControl,
};
