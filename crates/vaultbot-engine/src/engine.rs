//! The core [`QueryEngine`] trait.
//!
//! The question-answering engine is external and opaque: vaultbot only
//! consumes its typed response and forwards per-call ceilings.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AskRequest, EngineAnswer};

/// A capability that can answer questions against the vault.
///
/// The main implementation is [`HttpQueryEngine`](crate::http::HttpQueryEngine),
/// which talks to a local agent service over HTTP. Tests substitute
/// scripted implementations.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Returns the engine name (for logging).
    fn name(&self) -> &str;

    /// Pose a question and wait for the completed answer.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`](crate::error::EngineError) if the call
    /// fails for any reason; partial provider-side cost of a failed
    /// call is not reported back.
    async fn ask(&self, request: &AskRequest) -> Result<EngineAnswer>;
}
