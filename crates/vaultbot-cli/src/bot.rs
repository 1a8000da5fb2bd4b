//! Bot behavior: command routing, capture, and query handling.
//!
//! [`Bot`] is the [`InboundHandler`] behind the Telegram channel. Every
//! event is first checked against the single authorized user; anyone
//! else is dropped without a reply so the bot stays invisible to
//! strangers. Plain messages become vault captures acknowledged with an
//! emoji reaction; `/ask` and `/quick` run through the query
//! orchestrator with a progress message and a typing indicator.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use tracing::{debug, error, info, warn};

use vaultbot_core::{CachedAnswer, DedupGuard, Heartbeat, QueryOrchestrator, QueryOutcome};
use vaultbot_engine::QueryEngine;
use vaultbot_notes::NoteStore;
use vaultbot_telegram::{InboundHandler, TelegramClient};
use vaultbot_types::{Config, InboundEvent, Reaction, Tier};

/// Telegram caps messages at 4096 characters; leave room for the footer.
const MAX_REPLY_CHARS: usize = 3900;

/// How often to refresh the typing indicator while the engine works.
const TYPING_PERIOD: Duration = Duration::from_secs(4);

/// The capture/query bot.
pub struct Bot {
    allowed_user_id: i64,
    client: Arc<TelegramClient>,
    orchestrator: QueryOrchestrator,
    dedup: DedupGuard,
    store: Arc<NoteStore>,
    /// Most recent capture failure, surfaced by /status.
    last_error: Mutex<Option<String>>,
}

impl Bot {
    pub fn new(config: &Config, client: Arc<TelegramClient>, engine: Arc<dyn QueryEngine>) -> Self {
        Self {
            allowed_user_id: config.telegram.allowed_user_id,
            client,
            orchestrator: QueryOrchestrator::new(
                engine,
                &config.limits,
                config.engine.fast.clone(),
                config.engine.thorough.clone(),
            ),
            dedup: DedupGuard::new(Duration::from_secs(config.limits.dedup_window_seconds)),
            store: Arc::new(NoteStore::new(config.vault.clone())),
            last_error: Mutex::new(None),
        }
    }

    /// Capture a plain message into the vault.
    async fn handle_capture(&self, event: &InboundEvent) {
        let is_duplicate = self
            .dedup
            .check_and_record(&event.content, event.message_timestamp.timestamp());
        if is_duplicate {
            info!(message_id = event.message_id, "skipping duplicate message");
            self.react(event, Reaction::Neutral).await;
            return;
        }

        let store = Arc::clone(&self.store);
        let content = event.content.clone();
        let forward = event.forward_from.clone();
        let captured_at = Local::now().naive_local();

        // git2 and file IO are blocking; keep them off the runtime threads.
        let outcome =
            tokio::task::spawn_blocking(move || store.save(&content, captured_at, forward.as_deref()))
                .await;

        match outcome {
            Ok(outcome) if outcome.is_success() => {
                self.react(event, Reaction::Positive).await;
                *self.last_error.lock().expect("last_error lock poisoned") = None;
            }
            Ok(outcome) => {
                let err = outcome.error.unwrap_or_else(|| "unknown error".to_string());
                error!(error = %err, "failed to save capture");
                self.react(event, Reaction::Negative).await;
                *self.last_error.lock().expect("last_error lock poisoned") = Some(err);
            }
            Err(e) => {
                error!(error = %e, "capture task panicked");
                self.react(event, Reaction::Negative).await;
                *self.last_error.lock().expect("last_error lock poisoned") =
                    Some(format!("capture task failed: {e}"));
            }
        }
    }

    /// Run a query and edit the progress message with the result.
    async fn handle_query(&self, event: &InboundEvent, question: &str, tier: Tier) {
        if question.is_empty() {
            let cmd = match tier {
                Tier::Thorough => "/ask",
                Tier::Fast => "/quick",
            };
            self.reply(event, &format!("Usage: {cmd} <your question>"), false)
                .await;
            return;
        }

        let emoji = match tier {
            Tier::Thorough => "\u{1F50D}",
            Tier::Fast => "\u{26A1}",
        };
        let progress = match self
            .client
            .send_message(event.chat_id, &format!("{emoji} Searching vault..."), false)
            .await
        {
            Ok(msg) => msg,
            Err(e) => {
                warn!(error = %e, "could not send progress message");
                return;
            }
        };

        let typing_client = Arc::clone(&self.client);
        let chat_id = event.chat_id;
        let typing = Heartbeat::spawn(TYPING_PERIOD, move || {
            let client = Arc::clone(&typing_client);
            async move {
                // Best effort; a failed typing action is invisible anyway.
                let _ = client.send_typing(chat_id).await;
            }
        });

        let outcome = self.orchestrator.ask(event.sender_id, question, tier).await;
        typing.stop().await;

        let (text, markdown) = match outcome {
            QueryOutcome::Answered { answer, cached } => (render_answer(&answer, cached), true),
            QueryOutcome::RateLimited { wait_secs } => (
                format!("\u{23F3} Please wait {wait_secs}s before the next query."),
                false,
            ),
            QueryOutcome::OverBudget {
                spent_usd,
                limit_usd,
            } => (
                format!("\u{1F4B0} Daily budget reached (${spent_usd:.2} of ${limit_usd:.2})."),
                false,
            ),
            QueryOutcome::Failed { reason } => {
                let brief: String = reason.chars().take(200).collect();
                (format!("\u{274C} Error: {brief}"), false)
            }
        };

        if let Err(e) = self
            .client
            .edit_message_text(event.chat_id, progress.message_id, &text, markdown)
            .await
        {
            warn!(error = %e, "could not edit progress message");
        }
    }

    /// Reply to /status with capture and budget stats.
    async fn handle_status(&self, event: &InboundEvent) {
        let today_count = self.store.count_on(Local::now().date_naive());
        let spent = self.orchestrator.spent_today(event.sender_id);
        let remaining = self.orchestrator.remaining_today(event.sender_id);
        let recent = self.store.recent_captures(5);
        let last_error = self
            .last_error
            .lock()
            .expect("last_error lock poisoned")
            .clone();

        let mut lines = vec![
            "\u{2705} *Bot Status*".to_string(),
            String::new(),
            format!("\u{1F4CA} *Today:* {today_count} captures"),
            format!("\u{1F4B0} *Budget:* ${spent:.2} spent / ${remaining:.2} remaining"),
            String::new(),
        ];

        if recent.is_empty() {
            lines.push("\u{1F4DD} *Recent:* None".to_string());
        } else {
            lines.push("\u{1F4DD} *Recent:*".to_string());
            for capture in &recent {
                lines.push(format!("\u{2022} `{}` {}", capture.time, capture.preview));
            }
        }

        lines.push(String::new());
        match last_error {
            Some(err) => lines.push(format!("\u{26A0}\u{FE0F} *Last error:* {err}")),
            None => lines.push("\u{2713} No errors".to_string()),
        }

        self.reply(event, &lines.join("\n"), true).await;
    }

    async fn handle_help(&self, event: &InboundEvent) {
        let help = "\
*vaultbot*

*Capture:*
\u{2022} Send any message \u{2192} Saved to vault inbox

*Query:*
\u{2022} `/ask` or `/a` <question> \u{2192} Query vault (thorough)
\u{2022} `/quick` or `/q` <question> \u{2192} Query vault (fast)

*Info:*
\u{2022} `/status` \u{2192} Capture stats
\u{2022} `/help` \u{2192} This message

*Examples:*
`/a what are my current priorities?`
`/q summarize my recent notes`";
        self.reply(event, help, true).await;
    }

    async fn reply(&self, event: &InboundEvent, text: &str, markdown: bool) {
        if let Err(e) = self.client.send_message(event.chat_id, text, markdown).await {
            warn!(error = %e, "could not send reply");
        }
    }

    async fn react(&self, event: &InboundEvent, reaction: Reaction) {
        if let Err(e) = self
            .client
            .set_reaction(event.chat_id, event.message_id, reaction)
            .await
        {
            warn!(error = %e, "could not set reaction");
        }
    }
}

#[async_trait]
impl InboundHandler for Bot {
    async fn handle(&self, event: InboundEvent) {
        if event.sender_id != self.allowed_user_id {
            warn!(sender_id = event.sender_id, "unauthorized access attempt");
            return;
        }

        match parse_command(&event.content) {
            None => self.handle_capture(&event).await,
            Some(Command::Ask(question)) => {
                self.handle_query(&event, question, Tier::Thorough).await
            }
            Some(Command::Quick(question)) => self.handle_query(&event, question, Tier::Fast).await,
            Some(Command::Status) => self.handle_status(&event).await,
            Some(Command::Help) => self.handle_help(&event).await,
            Some(Command::Unknown) => {
                debug!(content = %event.content, "ignoring unknown command");
            }
        }
    }
}

/// A recognized slash command.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Ask(&'a str),
    Quick(&'a str),
    Status,
    Help,
    Unknown,
}

/// Parse a slash command. Returns `None` for plain messages, which are
/// captured instead.
fn parse_command(content: &str) -> Option<Command<'_>> {
    if !content.starts_with('/') {
        return None;
    }

    let (word, rest) = match content.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (content, ""),
    };

    // "/ask@my_bot" arrives in group chats; the suffix is irrelevant here.
    let name = word.split('@').next().unwrap_or(word);

    match name {
        "/ask" | "/a" => Some(Command::Ask(rest)),
        "/quick" | "/q" => Some(Command::Quick(rest)),
        "/status" => Some(Command::Status),
        "/help" => Some(Command::Help),
        _ => Some(Command::Unknown),
    }
}

/// Render an answer for Telegram: truncate to fit, then append either
/// the cached marker or a model/token/cost footer.
fn render_answer(answer: &CachedAnswer, cached: bool) -> String {
    let mut text = if answer.answer.chars().count() > MAX_REPLY_CHARS {
        let mut truncated: String = answer.answer.chars().take(MAX_REPLY_CHARS).collect();
        truncated.push_str("\n\n_[Truncated]_");
        truncated
    } else {
        answer.answer.clone()
    };

    if cached {
        text.push_str("\n\n_[Cached result]_");
        return text;
    }

    let model = short_model(&answer.model);
    if answer.input_tokens > 0 || answer.output_tokens > 0 {
        text.push_str(&format!(
            "\n\n_{model} | {}\u{2192}{} tok | ${:.3}_",
            group_thousands(answer.input_tokens),
            group_thousands(answer.output_tokens),
            answer.cost_usd
        ));
    } else {
        text.push_str(&format!("\n\n_{model} | ${:.3}_", answer.cost_usd));
    }
    text
}

/// Compact model name for the footer: drops the `claude-` prefix and a
/// trailing date stamp like `-20250514`.
fn short_model(model: &str) -> String {
    let model = model.strip_prefix("claude-").unwrap_or(model);
    if let Some((head, tail)) = model.rsplit_once('-') {
        if tail.len() == 8 && tail.chars().all(|c| c.is_ascii_digit()) {
            return head.to_string();
        }
    }
    model.to_string()
}

/// Decimal grouping with commas, e.g. `12345` becomes `12,345`.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(text: &str) -> CachedAnswer {
        CachedAnswer {
            answer: text.to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            cost_usd: 0.042,
            input_tokens: 12345,
            output_tokens: 678,
        }
    }

    #[test]
    fn plain_message_is_not_a_command() {
        assert!(parse_command("remember the milk").is_none());
        assert!(parse_command("").is_none());
    }

    #[test]
    fn ask_and_alias_carry_question() {
        assert_eq!(
            parse_command("/ask what are my priorities?"),
            Some(Command::Ask("what are my priorities?"))
        );
        assert_eq!(parse_command("/a hello"), Some(Command::Ask("hello")));
    }

    #[test]
    fn quick_and_alias_carry_question() {
        assert_eq!(
            parse_command("/quick summarize"),
            Some(Command::Quick("summarize"))
        );
        assert_eq!(parse_command("/q summarize"), Some(Command::Quick("summarize")));
    }

    #[test]
    fn bare_command_has_empty_question() {
        assert_eq!(parse_command("/ask"), Some(Command::Ask("")));
        assert_eq!(parse_command("/ask   "), Some(Command::Ask("")));
    }

    #[test]
    fn bot_mention_suffix_is_stripped() {
        assert_eq!(
            parse_command("/ask@my_vault_bot hello"),
            Some(Command::Ask("hello"))
        );
    }

    #[test]
    fn info_commands() {
        assert_eq!(parse_command("/status"), Some(Command::Status));
        assert_eq!(parse_command("/help"), Some(Command::Help));
    }

    #[test]
    fn unknown_command_is_flagged_not_captured() {
        assert_eq!(parse_command("/start"), Some(Command::Unknown));
    }

    #[test]
    fn footer_carries_model_tokens_and_cost() {
        let text = render_answer(&answer("The plan is X."), false);
        assert!(text.starts_with("The plan is X."));
        assert!(text.ends_with("_sonnet-4 | 12,345\u{2192}678 tok | $0.042_"));
    }

    #[test]
    fn footer_without_tokens_omits_token_section() {
        let mut a = answer("ok");
        a.input_tokens = 0;
        a.output_tokens = 0;
        let text = render_answer(&a, false);
        assert!(text.ends_with("_sonnet-4 | $0.042_"));
        assert!(!text.contains("tok"));
    }

    #[test]
    fn cached_answer_gets_marker_instead_of_footer() {
        let text = render_answer(&answer("ok"), true);
        assert!(text.ends_with("_[Cached result]_"));
        assert!(!text.contains("$0.042"));
    }

    #[test]
    fn long_answer_is_truncated() {
        let long = "x".repeat(5000);
        let text = render_answer(&answer(&long), false);
        assert!(text.contains("_[Truncated]_"));
        // 3900 body chars plus the truncation marker and footer.
        let body = text.split("\n\n").next().unwrap();
        assert_eq!(body.chars().count(), MAX_REPLY_CHARS);
    }

    #[test]
    fn short_answer_is_untouched() {
        let text = render_answer(&answer("short"), false);
        assert!(!text.contains("[Truncated]"));
    }

    #[test]
    fn short_model_strips_prefix_and_date() {
        assert_eq!(short_model("claude-sonnet-4-20250514"), "sonnet-4");
        assert_eq!(short_model("claude-haiku-3"), "haiku-3");
        assert_eq!(short_model("sonnet"), "sonnet");
    }

    #[test]
    fn group_thousands_formats() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
