//! Long-polling update loop.
//!
//! [`TelegramChannel`] polls `getUpdates`, converts each message into a
//! transport-agnostic [`InboundEvent`], and hands it to an
//! [`InboundHandler`]. Each event is handled on its own task so a slow
//! query cannot delay the next poll or block captures behind it.
//!
//! The offset advances past every received update whether or not its
//! handler succeeds. An update is delivered at most once; a handler
//! crash loses that one event rather than wedging the loop on it.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use vaultbot_types::error::ChannelError;
use vaultbot_types::InboundEvent;

use crate::client::TelegramClient;
use crate::extract::{forward_source, message_content};
use crate::types::Update;

/// Long-poll timeout in seconds for `getUpdates`.
const POLL_TIMEOUT_SECS: u64 = 30;

/// Delay before retrying after a poll error, in seconds.
const ERROR_RETRY_DELAY_SECS: u64 = 5;

/// Receives inbound events from the channel.
#[async_trait]
pub trait InboundHandler: Send + Sync {
    async fn handle(&self, event: InboundEvent);
}

/// Telegram long-polling transport.
pub struct TelegramChannel {
    /// Shared API client.
    client: Arc<TelegramClient>,
    /// Offset for the next `getUpdates` call (update_id + 1).
    offset: AtomicI64,
}

impl TelegramChannel {
    pub fn new(client: Arc<TelegramClient>) -> Self {
        Self {
            client,
            offset: AtomicI64::new(0),
        }
    }

    /// Poll for updates and dispatch them until cancelled.
    ///
    /// Verifies the bot token first; an invalid token fails fast rather
    /// than entering the poll loop.
    pub async fn run(
        &self,
        handler: Arc<dyn InboundHandler>,
        cancel: CancellationToken,
    ) -> Result<(), ChannelError> {
        let me = self.client.get_me().await?;
        info!(bot_id = me.id, bot_name = %me.first_name, "Telegram bot authenticated");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Telegram channel received cancellation");
                    break;
                }
                result = self.client.get_updates(
                    Some(self.offset.load(Ordering::SeqCst)),
                    POLL_TIMEOUT_SECS,
                ) => {
                    match result {
                        Ok(updates) => {
                            for update in updates {
                                // Advance past this update regardless of
                                // what dispatch does with it.
                                self.offset.store(update.update_id + 1, Ordering::SeqCst);
                                self.dispatch(update, &handler);
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "getUpdates failed");
                            tokio::select! {
                                _ = cancel.cancelled() => {
                                    info!("Telegram channel cancelled during error backoff");
                                    break;
                                }
                                _ = tokio::time::sleep(
                                    std::time::Duration::from_secs(ERROR_RETRY_DELAY_SECS)
                                ) => {}
                            }
                        }
                    }
                }
            }
        }

        info!("Telegram channel stopped");
        Ok(())
    }

    /// Convert one update into an event and hand it off on its own task.
    fn dispatch(&self, update: Update, handler: &Arc<dyn InboundHandler>) {
        let Some(event) = event_from_update(&update) else {
            debug!(update_id = update.update_id, "skipping non-message update");
            return;
        };

        let handler = Arc::clone(handler);
        tokio::spawn(async move {
            handler.handle(event).await;
        });
    }
}

/// Build an [`InboundEvent`] from an update, when it carries a message
/// with an identifiable sender.
fn event_from_update(update: &Update) -> Option<InboundEvent> {
    let msg = update.message.as_ref()?;

    let Some(from) = &msg.from else {
        warn!(message_id = msg.message_id, "message without sender, ignoring");
        return None;
    };

    let message_timestamp = DateTime::<Utc>::from_timestamp(msg.date, 0).unwrap_or_else(Utc::now);

    Some(InboundEvent {
        sender_id: from.id,
        chat_id: msg.chat.id,
        message_id: msg.message_id,
        content: message_content(msg),
        forward_from: forward_source(msg),
        message_timestamp,
    })
}
