//! HTTP implementation of [`QueryEngine`].
//!
//! Posts the [`AskRequest`] as JSON to a configured agent endpoint and
//! parses the `{ answer, cost_usd, model, usage }` response body.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info};

use crate::engine::QueryEngine;
use crate::error::{EngineError, Result};
use crate::types::{AskRequest, EngineAnswer};

/// Fallback answer when the engine returns an empty string.
const EMPTY_ANSWER_FALLBACK: &str =
    "I wasn't able to find an answer to your question in the vault.";

/// [`QueryEngine`] backed by an HTTP agent service.
pub struct HttpQueryEngine {
    /// Shared HTTP client.
    http: Client,
    /// Full URL of the ask endpoint.
    endpoint: String,
}

impl HttpQueryEngine {
    /// Create an engine client for the given endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl QueryEngine for HttpQueryEngine {
    fn name(&self) -> &str {
        "http"
    }

    async fn ask(&self, request: &AskRequest) -> Result<EngineAnswer> {
        debug!(
            model = %request.model,
            max_turns = request.max_turns,
            max_budget_usd = request.max_budget_usd,
            "starting vault query"
        );

        let resp = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| EngineError::RequestFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(status = %status, "engine returned error status");
            return Err(EngineError::EngineFailure(format!(
                "status {status}: {body}"
            )));
        }

        let mut answer: EngineAnswer = resp
            .json()
            .await
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;

        if answer.answer.trim().is_empty() {
            answer.answer = EMPTY_ANSWER_FALLBACK.to_string();
        }

        info!(
            model = %answer.model,
            cost_usd = answer.cost_usd,
            input_tokens = answer.usage.input_tokens,
            output_tokens = answer.usage.output_tokens,
            "query completed"
        );

        Ok(answer)
    }
}
