//! Content extraction from Telegram messages.
//!
//! Captures record text when it exists and a bracketed placeholder for
//! payloads the bot does not download. A media caption counts as text.

use crate::types::{ForwardOrigin, Message};

/// Text to capture for a message, or a placeholder naming the payload.
pub fn message_content(msg: &Message) -> String {
    if let Some(text) = msg.text.as_deref().or(msg.caption.as_deref()) {
        if !text.is_empty() {
            return text.to_string();
        }
    }

    if msg.voice.is_some() {
        "[Voice message - transcription not available]".to_string()
    } else if msg.photo.is_some() {
        "[Photo - not downloaded]".to_string()
    } else if let Some(doc) = &msg.document {
        let filename = doc.file_name.as_deref().unwrap_or("unnamed");
        format!("[Document: {filename}]")
    } else if msg.video.is_some() {
        "[Video - not downloaded]".to_string()
    } else if let Some(sticker) = &msg.sticker {
        let emoji = sticker.emoji.as_deref().unwrap_or("");
        format!("[Sticker {emoji}]")
    } else if let Some(location) = &msg.location {
        format!("[Location: {}, {}]", location.latitude, location.longitude)
    } else {
        "[Unsupported message type]".to_string()
    }
}

/// Display name of the forward source, when the message was forwarded.
pub fn forward_source(msg: &Message) -> Option<String> {
    let origin = msg.forward_origin.as_ref()?;
    let name = match origin {
        ForwardOrigin::User { sender_user } => sender_user.full_name(),
        ForwardOrigin::HiddenUser { sender_user_name } => sender_user_name.clone(),
        ForwardOrigin::Chat { sender_chat } => sender_chat
            .title
            .clone()
            .unwrap_or_else(|| "Chat".to_string()),
        ForwardOrigin::Channel { chat } => chat
            .title
            .clone()
            .unwrap_or_else(|| "Channel".to_string()),
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chat, Document, Location, Sticker, User, Video, Voice};

    fn base_message() -> Message {
        Message {
            message_id: 1,
            chat: Chat {
                id: 1,
                chat_type: "private".into(),
                title: None,
                username: None,
            },
            date: 1_700_000_000,
            ..Message::default()
        }
    }

    #[test]
    fn text_wins() {
        let mut msg = base_message();
        msg.text = Some("remember the milk".into());
        assert_eq!(message_content(&msg), "remember the milk");
    }

    #[test]
    fn caption_used_when_no_text() {
        let mut msg = base_message();
        msg.caption = Some("see attached".into());
        msg.photo = Some(vec![]);
        assert_eq!(message_content(&msg), "see attached");
    }

    #[test]
    fn voice_placeholder() {
        let mut msg = base_message();
        msg.voice = Some(Voice { duration: 12 });
        assert_eq!(
            message_content(&msg),
            "[Voice message - transcription not available]"
        );
    }

    #[test]
    fn photo_placeholder() {
        let mut msg = base_message();
        msg.photo = Some(vec![]);
        assert_eq!(message_content(&msg), "[Photo - not downloaded]");
    }

    #[test]
    fn document_placeholder_carries_filename() {
        let mut msg = base_message();
        msg.document = Some(Document {
            file_name: Some("notes.pdf".into()),
        });
        assert_eq!(message_content(&msg), "[Document: notes.pdf]");

        msg.document = Some(Document { file_name: None });
        assert_eq!(message_content(&msg), "[Document: unnamed]");
    }

    #[test]
    fn video_placeholder() {
        let mut msg = base_message();
        msg.video = Some(Video { duration: 30 });
        assert_eq!(message_content(&msg), "[Video - not downloaded]");
    }

    #[test]
    fn sticker_placeholder_carries_emoji() {
        let mut msg = base_message();
        msg.sticker = Some(Sticker {
            emoji: Some("🎉".into()),
        });
        assert_eq!(message_content(&msg), "[Sticker 🎉]");
    }

    #[test]
    fn location_placeholder_carries_coordinates() {
        let mut msg = base_message();
        msg.location = Some(Location {
            latitude: 52.52,
            longitude: 13.405,
        });
        assert_eq!(message_content(&msg), "[Location: 52.52, 13.405]");
    }

    #[test]
    fn unsupported_fallback() {
        let msg = base_message();
        assert_eq!(message_content(&msg), "[Unsupported message type]");
    }

    #[test]
    fn forward_source_absent_for_direct_message() {
        let msg = base_message();
        assert!(forward_source(&msg).is_none());
    }

    #[test]
    fn forward_source_for_user() {
        let mut msg = base_message();
        msg.forward_origin = Some(ForwardOrigin::User {
            sender_user: User {
                id: 5,
                is_bot: false,
                first_name: "Ada".into(),
                last_name: Some("Lovelace".into()),
                username: None,
            },
        });
        assert_eq!(forward_source(&msg).as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn forward_source_for_hidden_user() {
        let mut msg = base_message();
        msg.forward_origin = Some(ForwardOrigin::HiddenUser {
            sender_user_name: "Someone".into(),
        });
        assert_eq!(forward_source(&msg).as_deref(), Some("Someone"));
    }

    #[test]
    fn forward_source_for_untitled_channel_falls_back() {
        let mut msg = base_message();
        msg.forward_origin = Some(ForwardOrigin::Channel {
            chat: Chat::default(),
        });
        assert_eq!(forward_source(&msg).as_deref(), Some("Channel"));
    }
}
