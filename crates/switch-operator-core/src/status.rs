//! The in-band status carried by every device reply.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric status codes.
///
/// Zero means success, everything else is a domain error. The write, read and
/// key-check codes are distinct so a failed rollback can be told apart from
/// the failure that triggered it.
pub mod code {
    /// The operation succeeded.
    pub const SUCCESS: u32 = 0;
    /// Generic client-side failure, used when rendering.
    pub const CLIENT_ERROR: u32 = 1;
    /// Generic server-side failure, used when rendering.
    pub const SERVER_ERROR: u32 = 2;
    /// Malformed input or an unreachable store.
    pub const BAD_REQUEST: u32 = 101;
    /// A key or required field is missing.
    pub const NOT_FOUND: u32 = 201;
    /// Duplicate creation. Currently unused.
    pub const ALREADY_EXISTS: u32 = 202;
    /// A hash write failed.
    pub const REDIS_HSET_FAIL: u32 = 203;
    /// A hash read failed.
    pub const REDIS_HGET_FAIL: u32 = 204;
    /// A key existence check or read-back failed.
    pub const REDIS_KEY_CHECK_FAIL: u32 = 205;
}

/// Result of a device operation: `code == 0` is success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Status {
    /// Status code, see [`code`].
    pub code: u32,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

impl Status {
    /// Create a status with an arbitrary code.
    #[must_use]
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The success status sent on the wire.
    #[must_use]
    pub fn ok() -> Self {
        Self::new(code::SUCCESS, "Success")
    }

    /// A `BAD_REQUEST` status.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(code::BAD_REQUEST, message)
    }

    /// A `NOT_FOUND` status.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(code::NOT_FOUND, message)
    }

    /// A `SERVER_ERROR` status.
    #[must_use]
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(code::SERVER_ERROR, message)
    }

    /// Whether this status reports success.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code == code::SUCCESS
    }

    /// Whether this status reports a missing key or field.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.code == code::NOT_FOUND
    }

    /// Prefix the message with operation context, keeping the code.
    #[must_use]
    pub fn context(self, prefix: &str) -> Self {
        Self {
            code: self.code,
            message: format!("{prefix}: {}", self.message),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            f.write_str(&self.message)
        } else {
            write!(f, "Code: {}, Message: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for Status {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_for_errors() {
        let status = Status::not_found("missing");
        assert_eq!(status.to_string(), "Code: 201, Message: missing");
        assert_eq!(Status::ok().to_string(), "Success");
    }

    #[test]
    fn context_keeps_code() {
        let status = Status::bad_request("no route").context("failed to list ports");
        assert_eq!(status.code, code::BAD_REQUEST);
        assert_eq!(status.message, "failed to list ports: no route");
    }

    #[test]
    fn missing_message_deserializes() {
        let status: Status = serde_json::from_str(r#"{"code":0}"#).unwrap();
        assert!(status.is_ok());
        assert!(status.message.is_empty());
    }
}
