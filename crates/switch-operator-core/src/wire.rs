//! Request and response bodies of the agent protocol.
//!
//! Every reply is a [`Response`] envelope: a [`Status`] plus an optional
//! payload. Domain failures travel in the status with a normal HTTP 200;
//! transport failures never carry a status.

use serde::{Deserialize, Serialize};

use crate::device::DeviceStatus;
use crate::status::Status;

/// Request body for operations that take no arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Empty {}

/// Request body naming a single interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterfaceRequest {
    /// Interface name.
    pub name: String,
}

/// Request body for changing an interface's admin status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAdminStatusRequest {
    /// Interface name.
    pub name: String,
    /// Desired admin status.
    pub admin_status: DeviceStatus,
}

/// Uniform reply envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response<T> {
    /// Outcome of the operation.
    pub status: Status,
    /// Payload, present on success.
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Response<T> {
    /// A successful reply.
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            status: Status::ok(),
            data: Some(data),
        }
    }

    /// A failed reply without payload.
    #[must_use]
    pub fn failure(status: Status) -> Self {
        Self { status, data: None }
    }

    /// Split into the single result a caller has to check.
    ///
    /// A nonzero status wins over any payload. A success without payload
    /// yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns the embedded status if it is not successful.
    pub fn into_result(self) -> Result<Option<T>, Status> {
        if self.status.is_ok() {
            Ok(self.data)
        } else {
            Err(self.status)
        }
    }
}

impl<T> From<Result<T, Status>> for Response<T> {
    fn from(result: Result<T, Status>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(status) => Self::failure(status),
        }
    }
}
