//! Error types for vaultbot.
//!
//! Provides [`VaultbotError`] as the top-level error type and
//! [`ChannelError`] for transport-specific failures. Both are
//! non-exhaustive to allow future extension without breaking downstream.

use thiserror::Error;

/// Top-level error type for vaultbot.
///
/// Admission and budget rejections are NOT errors -- they are ordinary
/// outcomes of the query pipeline and live in `vaultbot-core`. These
/// variants cover genuine failures: configuration, the external engine,
/// note persistence, and the chat transport.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum VaultbotError {
    /// Configuration is malformed or semantically invalid.
    #[error("invalid config: {reason}")]
    ConfigInvalid {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// The external question-answering engine failed.
    #[error("engine error: {0}")]
    Engine(String),

    /// Saving or committing a note failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// A channel-layer error bubbled up.
    #[error("channel error: {0}")]
    Channel(String),

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Channel-specific error type.
///
/// Used by the Telegram transport to report failures in connecting,
/// authenticating, or exchanging messages.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ChannelError {
    /// Failed to establish a connection to the channel backend.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Authentication / authorization was rejected.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Sending a message failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receiving a message failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// Catch-all for errors that do not fit other variants.
    #[error("{0}")]
    Other(String),
}

impl From<ChannelError> for VaultbotError {
    fn from(e: ChannelError) -> Self {
        VaultbotError::Channel(e.to_string())
    }
}

/// A convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, VaultbotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vaultbot_error_display() {
        let err = VaultbotError::ConfigInvalid {
            reason: "telegram.token not set".into(),
        };
        assert_eq!(err.to_string(), "invalid config: telegram.token not set");

        let err = VaultbotError::Engine("agent exited".into());
        assert_eq!(err.to_string(), "engine error: agent exited");
    }

    #[test]
    fn vaultbot_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: VaultbotError = io_err.into();
        assert!(matches!(err, VaultbotError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn vaultbot_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{bad}}").unwrap_err();
        let err: VaultbotError = json_err.into();
        assert!(matches!(err, VaultbotError::Json(_)));
    }

    #[test]
    fn channel_error_display() {
        let err = ChannelError::AuthFailed("bad token".into());
        assert_eq!(err.to_string(), "authentication failed: bad token");

        let err = ChannelError::Other("oops".into());
        assert_eq!(err.to_string(), "oops");
    }

    #[test]
    fn channel_error_converts_to_vaultbot_error() {
        let err: VaultbotError = ChannelError::SendFailed("timeout".into()).into();
        assert!(matches!(err, VaultbotError::Channel(_)));
        assert!(err.to_string().contains("send failed: timeout"));
    }

    #[test]
    fn result_alias_works() {
        fn ok_fn() -> Result<i32> {
            Ok(7)
        }
        assert_eq!(ok_fn().unwrap(), 7);
    }
}
