//! Core types for the vaultbot capture/query bot.
//!
//! This crate is dependency-light on purpose: configuration schema,
//! the error taxonomy, and the transport-agnostic event types shared
//! by every other vaultbot crate.

pub mod config;
pub mod error;
pub mod event;

pub use config::{Config, EngineConfig, LimitsConfig, TelegramConfig, TierConfig, VaultConfig};
pub use error::{ChannelError, Result, VaultbotError};
pub use event::{InboundEvent, Reaction, Tier};
