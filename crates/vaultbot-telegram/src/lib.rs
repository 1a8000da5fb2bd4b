//! Telegram Bot API transport for vaultbot.
//!
//! # Architecture
//!
//! - [`TelegramClient`] wraps the HTTP API (send, edit, react, typing)
//! - [`TelegramChannel`] runs the `getUpdates` long-poll loop
//! - [`InboundHandler`] is the seam the bot logic plugs into
//! - [`extract`] turns message payloads into capture text

pub mod channel;
pub mod client;
pub mod extract;
pub mod types;

pub use channel::{InboundHandler, TelegramChannel};
pub use client::TelegramClient;
