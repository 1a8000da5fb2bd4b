//! External question-answering engine interface for vaultbot.
//!
//! The engine is an external collaborator: given a question and per-call
//! ceilings (turn count, budget), it returns an answer with its cost and
//! token usage. This crate defines the typed interface and the HTTP
//! implementation; it has no dependency on other vaultbot crates.
//!
//! # Architecture
//!
//! - [`QueryEngine`] trait defines the ask interface
//! - [`HttpQueryEngine`] implements it against a local agent service
//! - [`AskRequest`] / [`EngineAnswer`] are the wire types

pub mod engine;
pub mod error;
pub mod http;
pub mod types;

pub use engine::QueryEngine;
pub use error::{EngineError, Result};
pub use http::HttpQueryEngine;
pub use types::{AskRequest, EngineAnswer, TokenUsage};
