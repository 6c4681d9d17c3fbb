//! Error types for the agent client.

use switch_operator_core::{code, Status};
use thiserror::Error;

/// Errors returned by agent client calls.
///
/// A call fails either in transport (no status was received) or remotely
/// (the agent answered with a nonzero status). Checking this one error is
/// enough to cover both.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The agent could not be reached or answered with a non-2xx response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The agent's reply could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The agent reported a domain failure.
    #[error("agent error: {0}")]
    Remote(Status),

    /// The client could not be configured.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// The remote status code, if the agent sent one.
    #[must_use]
    pub fn status_code(&self) -> Option<u32> {
        match self {
            Self::Remote(status) => Some(status.code),
            _ => None,
        }
    }

    /// Whether the agent reported `NOT_FOUND`.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(code::NOT_FOUND)
    }

    /// Check if this error is retriable.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<Status> for ClientError {
    fn from(status: Status) -> Self {
        Self::Remote(status)
    }
}

/// A specialized Result type for client calls.
pub type Result<T> = std::result::Result<T, ClientError>;
