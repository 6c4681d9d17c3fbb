//! In-memory device store for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::db::db_index;
use super::store::{Connector, DbConnection};
use crate::error::StoreError;

type Hash = HashMap<String, String>;

/// Hashes of all logical databases, with failure injection.
#[derive(Default)]
pub struct MemoryStore {
    dbs: Mutex<HashMap<i64, HashMap<String, Hash>>>,
    unreachable: AtomicBool,
    failing_reads: Mutex<HashSet<(i64, String)>>,
    writes_left: Mutex<Option<usize>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every connect and probe fail, or succeed again.
    pub fn set_reachable(&self, reachable: bool) {
        self.unreachable.store(!reachable, Ordering::SeqCst);
    }

    /// Set hash fields in the named database.
    pub fn insert(&self, db: &str, key: &str, fields: &[(&str, &str)]) {
        let mut dbs = self.dbs.lock();
        let hash = dbs
            .entry(db_index(db))
            .or_default()
            .entry(key.to_string())
            .or_default();
        for (field, value) in fields {
            hash.insert((*field).to_string(), (*value).to_string());
        }
    }

    /// Read one hash field from the named database.
    #[must_use]
    pub fn field(&self, db: &str, key: &str, field: &str) -> Option<String> {
        self.dbs
            .lock()
            .get(&db_index(db))
            .and_then(|keys| keys.get(key))
            .and_then(|hash| hash.get(field).cloned())
    }

    /// Make reads of `key` in the named database fail.
    pub fn fail_reads(&self, db: &str, key: &str) {
        self.failing_reads
            .lock()
            .insert((db_index(db), key.to_string()));
    }

    /// Allow `count` more successful writes, then fail all writes.
    pub fn fail_writes_after(&self, count: usize) {
        *self.writes_left.lock() = Some(count);
    }

    fn is_reachable(&self) -> bool {
        !self.unreachable.load(Ordering::SeqCst)
    }

    fn check_read(&self, index: i64, key: &str) -> Result<(), StoreError> {
        if self.failing_reads.lock().contains(&(index, key.to_string())) {
            return Err(StoreError::Unavailable(format!("read of {key} failed")));
        }
        Ok(())
    }

    fn take_write(&self) -> Result<(), StoreError> {
        let mut left = self.writes_left.lock();
        match left.as_mut() {
            Some(0) => Err(StoreError::Unavailable("write rejected".to_string())),
            Some(n) => {
                *n -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

/// Connector handing out [`MemoryStore`] connections and counting them.
pub struct MemoryConnector {
    store: Arc<MemoryStore>,
    connects: AtomicUsize,
    generation: Arc<AtomicU64>,
    delay: Option<Duration>,
}

impl MemoryConnector {
    /// Create a connector over `store`.
    #[must_use]
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            store,
            connects: AtomicUsize::new(0),
            generation: Arc::new(AtomicU64::new(0)),
            delay: None,
        }
    }

    /// Sleep this long inside every connect.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of connections opened so far.
    #[must_use]
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Make every connection opened so far fail its liveness probe.
    pub fn kill_open_connections(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self, _name: &str, index: i64) -> Result<Arc<dyn DbConnection>, StoreError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if !self.store.is_reachable() {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MemoryConnection {
            store: Arc::clone(&self.store),
            index,
            generation: self.generation.load(Ordering::SeqCst),
            current: Arc::clone(&self.generation),
        }))
    }
}

struct MemoryConnection {
    store: Arc<MemoryStore>,
    index: i64,
    generation: u64,
    current: Arc<AtomicU64>,
}

#[async_trait]
impl DbConnection for MemoryConnection {
    async fn ping(&self) -> Result<(), StoreError> {
        if !self.store.is_reachable() || self.generation != self.current.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection closed".to_string()));
        }
        Ok(())
    }

    async fn hgetall(&self, key: &str) -> Result<Hash, StoreError> {
        self.store.check_read(self.index, key)?;
        Ok(self
            .store
            .dbs
            .lock()
            .get(&self.index)
            .and_then(|keys| keys.get(key).cloned())
            .unwrap_or_default())
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        self.store.take_write()?;
        self.store
            .dbs
            .lock()
            .entry(self.index)
            .or_default()
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self
            .store
            .dbs
            .lock()
            .get(&self.index)
            .is_some_and(|keys| keys.contains_key(key)))
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let dbs = self.store.dbs.lock();
        let Some(keys) = dbs.get(&self.index) else {
            return Ok(Vec::new());
        };
        let matches = |key: &str| match pattern.strip_suffix('*') {
            Some(prefix) => key.starts_with(prefix),
            None => key == pattern,
        };
        Ok(keys.keys().filter(|k| matches(k)).cloned().collect())
    }
}
