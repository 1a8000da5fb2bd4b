//! HTTP client wrapper for the Telegram Bot API.
//!
//! [`TelegramClient`] provides typed methods for the subset of the Bot
//! API vaultbot uses: `getMe`, `getUpdates`, `sendMessage`,
//! `editMessageText`, `setMessageReaction`, and `sendChatAction`.

use reqwest::Client;
use tracing::{debug, trace};

use vaultbot_types::error::ChannelError;
use vaultbot_types::Reaction;

use crate::types::{
    EditMessageTextRequest, Message, ReactionTypeEmoji, SendChatActionRequest, SendMessageRequest,
    SetMessageReactionRequest, TelegramResponse, Update, User,
};

/// HTTP client for the Telegram Bot API.
///
/// Wraps a [`reqwest::Client`] and the bot token to provide typed
/// request methods. The base URL can be overridden for testing.
pub struct TelegramClient {
    /// Shared HTTP client.
    http: Client,
    /// Base URL: `https://api.telegram.org/bot{token}` by default.
    base_url: String,
}

impl TelegramClient {
    /// Create a new client with the given bot token.
    pub fn new(token: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: format!("https://api.telegram.org/bot{token}"),
        }
    }

    /// Create a client pointing at a custom base URL (for testing).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Return the base URL used for API requests.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Verify the bot token by calling the `getMe` endpoint.
    pub async fn get_me(&self) -> Result<User, ChannelError> {
        let url = format!("{}/getMe", self.base_url);

        debug!("verifying bot token");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;

        let body: TelegramResponse<User> = resp
            .json()
            .await
            .map_err(|e| ChannelError::AuthFailed(e.to_string()))?;

        if !body.ok {
            let desc = body.description.unwrap_or_else(|| "unauthorized".into());
            return Err(ChannelError::AuthFailed(desc));
        }

        body.result
            .ok_or_else(|| ChannelError::AuthFailed("missing result in response".into()))
    }

    /// Fetch new updates using long polling.
    ///
    /// `offset` is the ID of the first update to return; `timeout` is the
    /// long-poll timeout in seconds (0 for non-blocking).
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: u64,
    ) -> Result<Vec<Update>, ChannelError> {
        let mut url = format!("{}/getUpdates?timeout={timeout}", self.base_url);
        if let Some(off) = offset {
            url.push_str(&format!("&offset={off}"));
        }

        trace!(url = %url, "polling for updates");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;

        let body: TelegramResponse<Vec<Update>> = resp
            .json()
            .await
            .map_err(|e| ChannelError::ReceiveFailed(e.to_string()))?;

        if !body.ok {
            let desc = body.description.unwrap_or_else(|| "unknown error".into());
            return Err(ChannelError::ReceiveFailed(desc));
        }

        let updates = body.result.unwrap_or_default();
        debug!(count = updates.len(), "received updates");
        Ok(updates)
    }

    /// Send a text message to a chat. Returns the sent [`Message`].
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markdown: bool,
    ) -> Result<Message, ChannelError> {
        let req = SendMessageRequest {
            chat_id,
            text: text.to_owned(),
            parse_mode: markdown.then(|| "Markdown".to_string()),
            reply_to_message_id: None,
        };

        debug!(chat_id, "sending message");
        self.post("sendMessage", &req).await
    }

    /// Replace the text of a previously sent message.
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        markdown: bool,
    ) -> Result<(), ChannelError> {
        let req = EditMessageTextRequest {
            chat_id,
            message_id,
            text: text.to_owned(),
            parse_mode: markdown.then(|| "Markdown".to_string()),
        };

        debug!(chat_id, message_id, "editing message");
        // Telegram returns the edited Message; the caller has no use for it.
        let _: Message = self.post("editMessageText", &req).await?;
        Ok(())
    }

    /// Set a single emoji reaction on a message.
    pub async fn set_reaction(
        &self,
        chat_id: i64,
        message_id: i64,
        reaction: Reaction,
    ) -> Result<(), ChannelError> {
        let req = SetMessageReactionRequest {
            chat_id,
            message_id,
            reaction: vec![ReactionTypeEmoji::new(reaction.emoji())],
        };

        debug!(chat_id, message_id, emoji = reaction.emoji(), "setting reaction");
        let _: bool = self.post("setMessageReaction", &req).await?;
        Ok(())
    }

    /// Show the "typing..." indicator in a chat. Telegram clears it
    /// after a few seconds, so slow operations re-send it periodically.
    pub async fn send_typing(&self, chat_id: i64) -> Result<(), ChannelError> {
        let req = SendChatActionRequest {
            chat_id,
            action: "typing".to_string(),
        };

        trace!(chat_id, "sending typing action");
        let _: bool = self.post("sendChatAction", &req).await?;
        Ok(())
    }

    /// POST a JSON body to a Bot API method and unwrap the response.
    async fn post<B, T>(&self, method: &str, body: &B) -> Result<T, ChannelError>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}/{method}", self.base_url);

        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed(e.to_string()))?;

        let parsed: TelegramResponse<T> = resp
            .json()
            .await
            .map_err(|e| ChannelError::SendFailed(e.to_string()))?;

        if !parsed.ok {
            let desc = parsed.description.unwrap_or_else(|| "unknown error".into());
            return Err(ChannelError::SendFailed(desc));
        }

        parsed
            .result
            .ok_or_else(|| ChannelError::SendFailed("missing result in response".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn base_url_construction() {
        let client = TelegramClient::new("123:ABC");
        assert_eq!(client.base_url(), "https://api.telegram.org/bot123:ABC");
    }

    #[tokio::test]
    async fn get_me_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getMe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": {"id": 42, "is_bot": true, "first_name": "vaultbot"}
            })))
            .mount(&server)
            .await;

        let client = TelegramClient::with_base_url(server.uri());
        let me = client.get_me().await.unwrap();
        assert_eq!(me.id, 42);
        assert!(me.is_bot);
    }

    #[tokio::test]
    async fn get_me_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getMe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": false,
                "description": "Unauthorized"
            })))
            .mount(&server)
            .await;

        let client = TelegramClient::with_base_url(server.uri());
        let err = client.get_me().await.unwrap_err();
        assert!(matches!(err, ChannelError::AuthFailed(ref d) if d == "Unauthorized"));
    }

    #[tokio::test]
    async fn get_updates_passes_offset_and_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getUpdates"))
            .and(query_param("timeout", "30"))
            .and(query_param("offset", "101"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": [{
                    "update_id": 101,
                    "message": {
                        "message_id": 1,
                        "from": {"id": 9, "is_bot": false, "first_name": "A"},
                        "chat": {"id": 9, "type": "private"},
                        "text": "hi",
                        "date": 1700000000
                    }
                }]
            })))
            .mount(&server)
            .await;

        let client = TelegramClient::with_base_url(server.uri());
        let updates = client.get_updates(Some(101), 30).await.unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 101);
    }

    #[tokio::test]
    async fn send_message_with_markdown() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sendMessage"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": 7,
                "text": "hello",
                "parse_mode": "Markdown"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": {
                    "message_id": 55,
                    "chat": {"id": 7, "type": "private"},
                    "date": 1700000001
                }
            })))
            .mount(&server)
            .await;

        let client = TelegramClient::with_base_url(server.uri());
        let sent = client.send_message(7, "hello", true).await.unwrap();
        assert_eq!(sent.message_id, 55);
    }

    #[tokio::test]
    async fn edit_message_text_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/editMessageText"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": 7,
                "message_id": 55,
                "text": "updated"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": {
                    "message_id": 55,
                    "chat": {"id": 7, "type": "private"},
                    "date": 1700000002
                }
            })))
            .mount(&server)
            .await;

        let client = TelegramClient::with_base_url(server.uri());
        client.edit_message_text(7, 55, "updated", false).await.unwrap();
    }

    #[tokio::test]
    async fn set_reaction_sends_emoji() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/setMessageReaction"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": 7,
                "message_id": 9,
                "reaction": [{"type": "emoji", "emoji": "👍"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": true
            })))
            .mount(&server)
            .await;

        let client = TelegramClient::with_base_url(server.uri());
        client.set_reaction(7, 9, Reaction::Positive).await.unwrap();
    }

    #[tokio::test]
    async fn send_typing_action() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sendChatAction"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": 7,
                "action": "typing"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": true
            })))
            .mount(&server)
            .await;

        let client = TelegramClient::with_base_url(server.uri());
        client.send_typing(7).await.unwrap();
    }

    #[tokio::test]
    async fn api_error_surfaces_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": false,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let client = TelegramClient::with_base_url(server.uri());
        let err = client.send_message(7, "hello", false).await.unwrap_err();
        assert!(err.to_string().contains("chat not found"));
    }
}
