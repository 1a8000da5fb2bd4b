//! Request and response types for engine calls.
//!
//! The engine is an opaque capability: given a question and per-call
//! ceilings, it returns an answer, the model that produced it, a token
//! usage record, and the monetary cost of the call.

use serde::{Deserialize, Serialize};

/// A question posed to the engine, with per-call ceilings.
///
/// `max_turns` and `max_budget_usd` are collaboration limits the engine
/// is asked to honor; they are not enforced as wall-clock timeouts on
/// this side.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest {
    /// The user's question.
    pub question: String,

    /// Model identifier (e.g. "sonnet", "haiku").
    pub model: String,

    /// Maximum conversational turns the engine may take.
    pub max_turns: u32,

    /// Maximum spend the engine may incur, in USD.
    pub max_budget_usd: f64,
}

/// A completed answer from the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineAnswer {
    /// The answer text.
    pub answer: String,

    /// Cost of the call in USD.
    pub cost_usd: f64,

    /// The model that actually produced the answer.
    pub model: String,

    /// Token usage for the call.
    #[serde(default)]
    pub usage: TokenUsage,
}

/// Token usage record for one engine call.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    /// Tokens consumed from the prompt side.
    #[serde(default)]
    pub input_tokens: u64,

    /// Tokens generated by the model.
    #[serde(default)]
    pub output_tokens: u64,
}
