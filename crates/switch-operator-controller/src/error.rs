//! Error types for the controller crate.

use switch_agent_client::ClientError;
use switch_operator_api::ConversionError;
use thiserror::Error;

/// Errors that can occur while reconciling resources.
#[derive(Error, Debug)]
pub enum ControllerError {
    /// Kubernetes API error.
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// The switch agent failed or could not be reached.
    #[error("{0}")]
    Agent(#[from] ClientError),

    /// A state could not be mapped between the resource and the device.
    #[error("invalid state: {0}")]
    Conversion(#[from] ConversionError),

    /// The interface does not name its owning switch.
    #[error("switch interface {0} has no switch reference")]
    MissingSwitchRef(String),

    /// The referenced switch does not exist.
    #[error("switch not found: {0}")]
    SwitchNotFound(String),

    /// A required object field is not set.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// An object could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error, e.g. binding the health listener.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ControllerError {
    /// Check if this error is retriable.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Kube(_) | Self::Io(_) => true,
            Self::Agent(e) => e.is_retriable(),
            _ => false,
        }
    }

    /// Machine-readable reason recorded on a failed resource's `Ready` condition.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Conversion(_) => "InvalidState",
            Self::MissingSwitchRef(_) | Self::SwitchNotFound(_) => "MissingSwitchRef",
            _ => "AgentError",
        }
    }
}

/// A specialized Result type for controller operations.
pub type Result<T> = std::result::Result<T, ControllerError>;
