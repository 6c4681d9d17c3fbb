//! HTTP client for the switch agent.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use switch_operator_core::{
    DeviceStatus, Empty, Interface, InterfaceList, InterfaceNeighbor, InterfaceRequest, PortList,
    Response, SetAdminStatusRequest, SwitchDevice,
};
use tracing::debug;

use crate::error::{ClientError, Result};

/// Agent address used when none is configured.
pub const DEFAULT_ADDRESS: &str = "localhost:50051";

/// Time allowed to establish a connection to the agent.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(4);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Device operations as seen from the control plane.
///
/// This trait abstracts the agent client interface, allowing for mock
/// implementations in tests.
#[async_trait]
pub trait SwitchAgentClient: Send + Sync {
    /// Read the device identity.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a nonzero agent status.
    async fn get_device_info(&self) -> Result<SwitchDevice>;

    /// Enumerate all interfaces.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a nonzero agent status.
    async fn list_interfaces(&self) -> Result<InterfaceList>;

    /// Change an interface's admin status.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a nonzero agent status.
    async fn set_interface_admin_status(
        &self,
        name: &str,
        admin_status: DeviceStatus,
    ) -> Result<Interface>;

    /// Read one interface.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a nonzero agent status.
    async fn get_interface(&self, name: &str) -> Result<Interface>;

    /// Read an interface's link-layer neighbor.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a nonzero agent status;
    /// [`ClientError::is_not_found`] tells "no neighbor" apart.
    async fn get_interface_neighbor(&self, name: &str) -> Result<InterfaceNeighbor>;

    /// Enumerate physical ports.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a nonzero agent status.
    async fn list_ports(&self) -> Result<PortList>;
}

/// HTTP client for one switch agent.
///
/// Idle connections are not kept, so every call dials the agent afresh.
#[derive(Debug, Clone)]
pub struct HttpSwitchAgentClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSwitchAgentClient {
    /// Create a client for the agent at `address` (`host:port` or a URL).
    ///
    /// An empty address means [`DEFAULT_ADDRESS`]; a zero timeout means
    /// [`DEFAULT_CONNECT_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(address: &str, connect_timeout: Duration) -> Result<Self> {
        let connect_timeout = if connect_timeout.is_zero() {
            DEFAULT_CONNECT_TIMEOUT
        } else {
            connect_timeout
        };

        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(REQUEST_TIMEOUT)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self::with_client(client, address))
    }

    /// Create a client with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, address: &str) -> Self {
        let address = if address.is_empty() {
            DEFAULT_ADDRESS
        } else {
            address
        };
        let base_url = if address.contains("://") {
            address.trim_end_matches('/').to_string()
        } else {
            format!("http://{address}")
        };

        Self { client, base_url }
    }

    /// Get the base URL of the agent.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call<Req, T>(&self, operation: &str, request: &Req) -> Result<T>
    where
        Req: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}/v1/{operation}", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("{operation} request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Transport(format!(
                "{operation} returned HTTP {status}"
            )));
        }

        let reply = response
            .json::<Response<T>>()
            .await
            .map_err(|e| ClientError::Decode(format!("{operation}: {e}")))?;

        let data = reply.into_result().map_err(|status| {
            debug!(operation, code = status.code, message = %status.message, "Agent returned error status");
            ClientError::Remote(status)
        })?;

        data.ok_or_else(|| ClientError::Decode(format!("{operation}: missing payload")))
    }
}

#[async_trait]
impl SwitchAgentClient for HttpSwitchAgentClient {
    async fn get_device_info(&self) -> Result<SwitchDevice> {
        self.call("GetDeviceInfo", &Empty {}).await
    }

    async fn list_interfaces(&self) -> Result<InterfaceList> {
        self.call("ListInterfaces", &Empty {}).await
    }

    async fn set_interface_admin_status(
        &self,
        name: &str,
        admin_status: DeviceStatus,
    ) -> Result<Interface> {
        let request = SetAdminStatusRequest {
            name: name.to_string(),
            admin_status,
        };
        self.call("SetInterfaceAdminStatus", &request).await
    }

    async fn get_interface(&self, name: &str) -> Result<Interface> {
        let request = InterfaceRequest {
            name: name.to_string(),
        };
        self.call("GetInterface", &request).await
    }

    async fn get_interface_neighbor(&self, name: &str) -> Result<InterfaceNeighbor> {
        let request = InterfaceRequest {
            name: name.to_string(),
        };
        self.call("GetInterfaceNeighbor", &request).await
    }

    async fn list_ports(&self) -> Result<PortList> {
        self.call("ListPorts", &Empty {}).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_address_uses_default() {
        let client = HttpSwitchAgentClient::new("", Duration::ZERO).unwrap();
        assert_eq!(client.base_url(), "http://localhost:50051");
    }

    #[test]
    fn url_addresses_are_kept() {
        let client = HttpSwitchAgentClient::with_client(reqwest::Client::new(), "https://agent:8443/");
        assert_eq!(client.base_url(), "https://agent:8443");

        let client = HttpSwitchAgentClient::with_client(reqwest::Client::new(), "10.0.0.1:50051");
        assert_eq!(client.base_url(), "http://10.0.0.1:50051");
    }
}
