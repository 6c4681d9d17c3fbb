//! Building agent clients for a switch's management endpoint.

use std::sync::Arc;

use switch_agent_client::{HttpSwitchAgentClient, SwitchAgentClient, DEFAULT_ADDRESS};
use switch_operator_api::Switch;

use crate::config::ControllerConfig;
use crate::{ControllerError, Result};

/// Creates an agent client for a switch.
pub trait AgentClientFactory: Send + Sync {
    /// A client talking to `switch`'s agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    fn client_for(&self, switch: &Switch) -> Result<Arc<dyn SwitchAgentClient>>;
}

/// The agent address of a switch, falling back to [`DEFAULT_ADDRESS`].
#[must_use]
pub fn agent_address(switch: &Switch) -> String {
    switch
        .spec
        .management
        .address()
        .unwrap_or_else(|| DEFAULT_ADDRESS.to_string())
}

/// Factory for HTTP agent clients sharing one connection configuration.
pub struct HttpAgentClientFactory {
    http: reqwest::Client,
}

impl HttpAgentClientFactory {
    /// Create a factory with the configured agent timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &ControllerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.agent_connect_timeout)
            .timeout(config.agent_request_timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| ControllerError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { http })
    }
}

impl AgentClientFactory for HttpAgentClientFactory {
    fn client_for(&self, switch: &Switch) -> Result<Arc<dyn SwitchAgentClient>> {
        let address = agent_address(switch);
        Ok(Arc::new(HttpSwitchAgentClient::with_client(
            self.http.clone(),
            &address,
        )))
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use self::fixed::FixedAgentClientFactory;

#[cfg(any(test, feature = "test-utils"))]
mod fixed {
    use parking_lot::Mutex;

    use super::*;

    /// Hands out the same client for every switch and records the addresses.
    pub struct FixedAgentClientFactory {
        client: Arc<dyn SwitchAgentClient>,
        addresses: Mutex<Vec<String>>,
    }

    impl FixedAgentClientFactory {
        /// Create a factory returning `client`.
        #[must_use]
        pub fn new(client: Arc<dyn SwitchAgentClient>) -> Self {
            Self {
                client,
                addresses: Mutex::new(Vec::new()),
            }
        }

        /// Addresses clients were requested for.
        #[must_use]
        pub fn addresses(&self) -> Vec<String> {
            self.addresses.lock().clone()
        }
    }

    impl AgentClientFactory for FixedAgentClientFactory {
        fn client_for(&self, switch: &Switch) -> Result<Arc<dyn SwitchAgentClient>> {
            self.addresses.lock().push(agent_address(switch));
            Ok(Arc::clone(&self.client))
        }
    }
}
