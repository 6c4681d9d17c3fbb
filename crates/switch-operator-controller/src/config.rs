//! Controller configuration.

use std::time::Duration;

/// Configuration for the switch operator controllers.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Dial timeout for agent connections.
    pub agent_connect_timeout: Duration,
    /// Timeout for a single agent call.
    pub agent_request_timeout: Duration,
    /// Concurrent reconciles per controller.
    pub concurrency: u16,
    /// Delay before a failed reconcile is retried.
    pub requeue_after: Duration,
    /// Address of the health server.
    pub health_addr: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            agent_connect_timeout: Duration::from_secs(4),
            agent_request_timeout: Duration::from_secs(30),
            concurrency: 4,
            requeue_after: Duration::from_secs(30),
            health_addr: "0.0.0.0:8081".to_string(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(secs) = env_parse("AGENT_CONNECT_TIMEOUT_SECS") {
            config.agent_connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_parse("AGENT_REQUEST_TIMEOUT_SECS") {
            config.agent_request_timeout = Duration::from_secs(secs);
        }
        if let Some(n) = env_parse::<u16>("CONTROLLER_CONCURRENCY") {
            config.concurrency = n.max(1);
        }
        if let Some(secs) = env_parse("REQUEUE_AFTER_SECS") {
            config.requeue_after = Duration::from_secs(secs);
        }
        if let Ok(val) = std::env::var("HEALTH_ADDR") {
            config.health_addr = val;
        }

        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
