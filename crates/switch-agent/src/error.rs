//! Error types for the switch agent crate.

use thiserror::Error;

/// Errors raised while talking to the device store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The logical database name is not in the selector table.
    #[error("unknown database name: {0}")]
    UnknownDatabase(String),

    /// Redis protocol or connection error.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Check if this error is retriable.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::UnknownDatabase(_) => false,
            Self::Redis(e) => e.is_io_error() || e.is_timeout() || e.is_connection_dropped(),
            Self::Unavailable(_) => true,
        }
    }
}

/// Errors that stop the agent process.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Device store error during start-up.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error, e.g. binding the listener.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for agent start-up.
pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_database_is_not_retriable() {
        assert!(!StoreError::UnknownDatabase("NOPE_DB".to_string()).is_retriable());
        assert!(StoreError::Unavailable("connection refused".to_string()).is_retriable());
    }

    #[test]
    fn redis_io_error_is_retriable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(StoreError::Redis(redis::RedisError::from(io)).is_retriable());
    }
}
