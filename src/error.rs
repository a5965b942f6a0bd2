//! Error types for the session control plane.
//!
//! Only fatal conditions surface as [`AgentError`]: credential acquisition,
//! transport failures, startup configuration, and state-machine misuse.
//! Control-frame decode failures and dispatch validation failures are
//! log-and-continue paths by design and never appear here.

use thiserror::Error;

pub type AgentResult<T> = Result<T, AgentError>;

#[derive(Debug, Error)]
pub enum AgentError {
    /// The credential endpoint returned an empty or unparseable token.
    /// Fatal to session start; never retried.
    #[error("Credential error: {0}")]
    Credential(String),

    /// Signaling is not available for this session (no credential could be
    /// obtained). Fatal to start.
    #[error("Signaling not supported: {0}")]
    NotSupported(&'static str),

    /// An HTTP exchange failed. Fatal to the operation that issued it;
    /// recovery is the caller's responsibility.
    #[error("Transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The peer connection or media provider failed to come up.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The reliable channel rejected an outbound frame.
    #[error("Channel error: {0}")]
    Channel(String),

    /// An operation was invoked in a state that does not allow it.
    #[error("Invalid state: expected {expected}, found {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl AgentError {
    /// Transport failure from an HTTP status line.
    pub fn transport_status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Transport failure with no status (connection-level).
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }
}
