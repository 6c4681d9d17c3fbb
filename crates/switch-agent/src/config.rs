//! Agent configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Dial timeout for new store connections.
pub const REDIS_DIAL_TIMEOUT: Duration = Duration::from_secs(30);
/// Read/write timeout for a single store command.
pub const REDIS_RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);
/// Reconnect attempts before a command fails.
pub const REDIS_MAX_RETRIES: usize = 10;
/// First reconnect backoff.
pub const REDIS_MIN_RETRY_BACKOFF: Duration = Duration::from_millis(500);
/// Upper bound on reconnect backoff.
pub const REDIS_MAX_RETRY_BACKOFF: Duration = Duration::from_secs(10);

/// Default protocol port of the agent.
pub const DEFAULT_PORT: u16 = 50051;

/// Configuration for the switch agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Address the protocol server binds to.
    pub listen_addr: String,
    /// `host:port` of the device store.
    pub redis_addr: String,
    /// Fallback version manifest.
    pub version_file: PathBuf,
    /// Wait between an admin-status write and the state read-back.
    pub settle_delay: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            listen_addr: format!("0.0.0.0:{DEFAULT_PORT}"),
            redis_addr: "127.0.0.1:6379".to_string(),
            version_file: PathBuf::from("/etc/sonic/sonic_version.yml"),
            settle_delay: Duration::from_millis(1000),
        }
    }
}

impl AgentConfig {
    /// Load configuration from environment variables, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            redis_addr: std::env::var("REDIS_ADDR").unwrap_or(defaults.redis_addr),
            version_file: std::env::var("SONIC_VERSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.version_file),
            settle_delay: std::env::var("SETTLE_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map_or(defaults.settle_delay, Duration::from_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_device_layout() {
        let config = AgentConfig::default();
        assert_eq!(config.listen_addr, "0.0.0.0:50051");
        assert_eq!(config.redis_addr, "127.0.0.1:6379");
        assert_eq!(config.settle_delay, Duration::from_secs(1));
        assert_eq!(
            config.version_file,
            PathBuf::from("/etc/sonic/sonic_version.yml")
        );
    }
}
