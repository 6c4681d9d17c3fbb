//! One cached connection per logical database.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::db::{db_index, INVALID_DB};
use super::store::{Connector, DbConnection};
use crate::error::StoreError;

/// Cache of live connections keyed by database name.
///
/// Cache hits only take the read lock. Creation and eviction take the write
/// lock and re-check the cache first, so concurrent misses for the same
/// database open a single connection.
pub struct ConnectionPool {
    connector: Arc<dyn Connector>,
    connections: RwLock<HashMap<String, Arc<dyn DbConnection>>>,
}

impl ConnectionPool {
    /// Create an empty pool.
    #[must_use]
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Return a live connection to `db_name`, opening one if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownDatabase`] for names outside the selector
    /// table, or the connector's error if a new connection fails its probe.
    pub async fn connect(&self, db_name: &str) -> Result<Arc<dyn DbConnection>, StoreError> {
        let cached = self.connections.read().await.get(db_name).cloned();
        if let Some(conn) = cached {
            if conn.ping().await.is_ok() {
                return Ok(conn);
            }
        }

        let mut connections = self.connections.write().await;

        if let Some(conn) = connections.get(db_name).cloned() {
            if conn.ping().await.is_ok() {
                return Ok(conn);
            }
            warn!(db = db_name, "Evicting dead store connection");
            connections.remove(db_name);
        }

        let index = db_index(db_name);
        if index == INVALID_DB {
            return Err(StoreError::UnknownDatabase(db_name.to_string()));
        }

        let conn = self.connector.connect(db_name, index).await?;
        conn.ping().await?;
        connections.insert(db_name.to_string(), Arc::clone(&conn));
        debug!(db = db_name, index, "Cached store connection");

        Ok(conn)
    }

    /// Open and probe a connection without caching it.
    ///
    /// # Errors
    ///
    /// Returns the connector's or the probe's error.
    pub async fn probe(&self, db_name: &str) -> Result<(), StoreError> {
        let index = db_index(db_name);
        if index == INVALID_DB {
            return Err(StoreError::UnknownDatabase(db_name.to_string()));
        }
        self.connector.connect(db_name, index).await?.ping().await
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    #[cfg(test)]
    async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }
}
