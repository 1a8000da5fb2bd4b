//! Engine error types.
//!
//! All engine operations return [`Result<T>`] which uses [`EngineError`]
//! as the error type.

use thiserror::Error;

/// Errors that can occur when consulting the question-answering engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The HTTP request to the engine failed.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The engine reported a failure of its own.
    #[error("engine failure: {0}")]
    EngineFailure(String),

    /// The engine returned a response that could not be parsed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// An HTTP-level error from reqwest.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenience type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
