//! Connections to the logical databases of the device store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client};
use tracing::{debug, instrument};

use crate::config::{
    REDIS_DIAL_TIMEOUT, REDIS_MAX_RETRIES, REDIS_MAX_RETRY_BACKOFF, REDIS_MIN_RETRY_BACKOFF,
    REDIS_RESPONSE_TIMEOUT,
};
use crate::error::StoreError;

/// The hash commands the driver needs from one logical database.
#[async_trait]
pub trait DbConnection: Send + Sync {
    /// Liveness probe.
    async fn ping(&self) -> Result<(), StoreError>;

    /// All fields of a hash; empty when the key does not exist.
    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, StoreError>;

    /// Set one hash field.
    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError>;

    /// Whether a key exists.
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Keys matching a glob pattern.
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError>;
}

/// Opens connections to logical databases.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a connection to database `name` with selector `index`.
    async fn connect(&self, name: &str, index: i64) -> Result<Arc<dyn DbConnection>, StoreError>;
}

/// Connector for a Redis server with bounded timeouts and retries.
#[derive(Debug, Clone)]
pub struct RedisConnector {
    addr: String,
}

impl RedisConnector {
    /// Create a connector for the server at `host:port`.
    #[must_use]
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    fn manager_config() -> ConnectionManagerConfig {
        // Delays grow as factor * 2^attempt milliseconds.
        let factor = u64::try_from(REDIS_MIN_RETRY_BACKOFF.as_millis() / 2).unwrap_or(250);
        let max_delay = u64::try_from(REDIS_MAX_RETRY_BACKOFF.as_millis()).unwrap_or(10_000);

        ConnectionManagerConfig::new()
            .set_number_of_retries(REDIS_MAX_RETRIES)
            .set_exponent_base(2)
            .set_factor(factor)
            .set_max_delay(max_delay)
            .set_connection_timeout(REDIS_DIAL_TIMEOUT)
            .set_response_timeout(REDIS_RESPONSE_TIMEOUT)
    }
}

#[async_trait]
impl Connector for RedisConnector {
    #[instrument(skip(self), fields(addr = %self.addr))]
    async fn connect(&self, name: &str, index: i64) -> Result<Arc<dyn DbConnection>, StoreError> {
        let url = format!("redis://{}/{}", self.addr, index);
        let client = Client::open(url)?;
        let manager = ConnectionManager::new_with_config(client, Self::manager_config()).await?;
        debug!(db = name, index, "Opened store connection");
        Ok(Arc::new(RedisConnection { manager }))
    }
}

/// A managed connection to one logical database.
#[derive(Clone)]
pub struct RedisConnection {
    manager: ConnectionManager,
}

#[async_trait]
impl DbConnection for RedisConnection {
    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let mut conn = self.manager.clone();
        Ok(conn.hgetall(key).await?)
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        let _: () = conn.hset(key, field, value).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.manager.clone();
        Ok(conn.exists(key).await?)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.manager.clone();
        Ok(conn.keys(pattern).await?)
    }
}
