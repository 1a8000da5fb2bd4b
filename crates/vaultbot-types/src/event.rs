//! Inbound event and small enum types shared across crates.
//!
//! [`InboundEvent`] is the transport-agnostic form of a received
//! message: the channel layer extracts text (or a placeholder for
//! non-text payloads) and the forward source before handing it over.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An inbound message delivered by the chat transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Sender identifier (Telegram user ID).
    pub sender_id: i64,

    /// Chat the message arrived in.
    pub chat_id: i64,

    /// Message identifier within the chat.
    pub message_id: i64,

    /// Text content, or a descriptive placeholder for non-text payloads.
    pub content: String,

    /// Resolved forward source, when the message was forwarded.
    #[serde(default)]
    pub forward_from: Option<String>,

    /// The message's own timestamp (used for dedup, not wall clock).
    pub message_timestamp: DateTime<Utc>,
}

/// Query engine tier selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Cheap and quick.
    Fast,
    /// More turns, higher per-call ceiling.
    Thorough,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Fast => write!(f, "fast"),
            Tier::Thorough => write!(f, "thorough"),
        }
    }
}

/// Acknowledgment marker applied to a processed capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Saved successfully.
    Positive,
    /// Save failed.
    Negative,
    /// Already seen (duplicate).
    Neutral,
}

impl Reaction {
    /// The emoji Telegram expects for this marker.
    pub fn emoji(self) -> &'static str {
        match self {
            Reaction::Positive => "\u{1F44D}",
            Reaction::Negative => "\u{1F44E}",
            Reaction::Neutral => "\u{1F440}",
        }
    }
}
