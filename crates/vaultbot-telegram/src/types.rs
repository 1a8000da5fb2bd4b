//! Telegram Bot API types.
//!
//! Models the subset of the Bot API used by vaultbot: long polling,
//! message sending and editing, reactions, and chat actions. Message
//! payload fields beyond text (voice, photo, document, ...) are carried
//! so captures can record a placeholder for non-text content.

use serde::{Deserialize, Serialize};

/// Wrapper for all Telegram Bot API responses.
///
/// Every API method returns `{ ok: bool, result?: T, description?: String }`.
/// When `ok` is `false`, `description` contains the error message.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramResponse<T> {
    /// Whether the request was successful.
    pub ok: bool,
    /// The result payload, present when `ok` is `true`.
    pub result: Option<T>,
    /// Human-readable error description, present when `ok` is `false`.
    pub description: Option<String>,
}

/// A single update from the `getUpdates` long-polling endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonically increasing update identifier.
    pub update_id: i64,
    /// The message associated with this update, if any.
    pub message: Option<Message>,
}

/// A Telegram message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Message {
    /// Unique message identifier within the chat.
    pub message_id: i64,
    /// Sender of the message. Absent for messages in channels.
    pub from: Option<User>,
    /// Chat the message belongs to.
    pub chat: Chat,
    /// Unix timestamp of when the message was sent.
    pub date: i64,
    /// Text content, if any.
    pub text: Option<String>,
    /// Caption on a media message, if any.
    pub caption: Option<String>,
    /// Origin of a forwarded message.
    pub forward_origin: Option<ForwardOrigin>,
    /// Voice note payload.
    pub voice: Option<Voice>,
    /// Photo payload (one entry per resolution).
    pub photo: Option<Vec<PhotoSize>>,
    /// Document payload.
    pub document: Option<Document>,
    /// Video payload.
    pub video: Option<Video>,
    /// Sticker payload.
    pub sticker: Option<Sticker>,
    /// Location payload.
    pub location: Option<Location>,
}

/// A Telegram user or bot.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Whether this user is a bot.
    #[serde(default)]
    pub is_bot: bool,
    /// User's first name.
    pub first_name: String,
    /// User's last name, if set.
    pub last_name: Option<String>,
    /// User's username (without leading `@`), if set.
    pub username: Option<String>,
}

impl User {
    /// First and last name joined, matching how Telegram displays users.
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

/// A Telegram chat (private, group, supergroup, or channel).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Chat {
    /// Unique chat identifier.
    pub id: i64,
    /// Chat type: `"private"`, `"group"`, `"supergroup"`, or `"channel"`.
    #[serde(rename = "type", default)]
    pub chat_type: String,
    /// Title of the chat (for groups, supergroups, channels).
    pub title: Option<String>,
    /// Username of the chat, if set.
    pub username: Option<String>,
}

/// Origin of a forwarded message.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ForwardOrigin {
    /// Forwarded from a user with a visible account.
    User {
        /// The original sender.
        sender_user: User,
    },
    /// Forwarded from a user who hides their account.
    HiddenUser {
        /// Display name of the hidden sender.
        sender_user_name: String,
    },
    /// Forwarded on behalf of a chat.
    Chat {
        /// The chat the message was sent on behalf of.
        sender_chat: Chat,
    },
    /// Forwarded from a channel post.
    Channel {
        /// The channel the post came from.
        chat: Chat,
    },
}

/// A voice note.
#[derive(Debug, Clone, Deserialize)]
pub struct Voice {
    /// Duration in seconds.
    #[serde(default)]
    pub duration: i64,
}

/// One resolution of a photo.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    #[serde(default)]
    pub width: i64,
    #[serde(default)]
    pub height: i64,
}

/// An attached file.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    /// Original filename, if the sender's client provided one.
    pub file_name: Option<String>,
}

/// A video payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    /// Duration in seconds.
    #[serde(default)]
    pub duration: i64,
}

/// A sticker payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Sticker {
    /// Emoji associated with the sticker.
    pub emoji: Option<String>,
}

/// A shared location.
#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

// ── Request bodies ───────────────────────────────────────────────────────

/// Request body for the `sendMessage` API method.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    /// Target chat identifier.
    pub chat_id: i64,
    /// Text of the message to send.
    pub text: String,
    /// Parse mode for formatting (e.g., `"Markdown"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
    /// If set, the sent message will be a reply to this message ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
}

/// Request body for the `editMessageText` API method.
#[derive(Debug, Clone, Serialize)]
pub struct EditMessageTextRequest {
    pub chat_id: i64,
    /// The message to edit.
    pub message_id: i64,
    /// Replacement text.
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
}

/// Request body for the `setMessageReaction` API method.
#[derive(Debug, Clone, Serialize)]
pub struct SetMessageReactionRequest {
    pub chat_id: i64,
    /// The message to react to.
    pub message_id: i64,
    /// Reactions to set; vaultbot always sets exactly one.
    pub reaction: Vec<ReactionTypeEmoji>,
}

/// An emoji reaction inside a `setMessageReaction` request.
#[derive(Debug, Clone, Serialize)]
pub struct ReactionTypeEmoji {
    /// Always `"emoji"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub emoji: String,
}

impl ReactionTypeEmoji {
    pub fn new(emoji: &str) -> Self {
        Self {
            kind: "emoji".to_string(),
            emoji: emoji.to_string(),
        }
    }
}

/// Request body for the `sendChatAction` API method.
#[derive(Debug, Clone, Serialize)]
pub struct SendChatActionRequest {
    pub chat_id: i64,
    /// Action name, e.g. `"typing"`.
    pub action: String,
}
