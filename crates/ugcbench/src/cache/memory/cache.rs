//! In-memory cache implementation.
//!
//! Unbounded key-value store using tokio synchronization primitives. Entries
//! never expire; they are removed by `delete` or dropped all at once by `close`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use ugcbench_core::cache::{Cache, CacheError, Result};

/// In-memory cache implementation.
///
/// Thread-safe cache using `Arc<RwLock<HashMap>>` for concurrent access.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    connected: Arc<AtomicBool>,
    store: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryCache {
    /// Creates a new empty, disconnected in-memory cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Returns true if no keys are stored.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(CacheError::CacheUnavailable(
                "in-memory cache is not connected".to_string(),
            ))
        }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn connect(&self) -> Result<()> {
        self.connected.store(true, Ordering::Release);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.connected.store(false, Ordering::Release);
        self.store.write().await.clear();
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_connected()?;
        let store = self.store.read().await;
        Ok(store.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.ensure_connected()?;
        let mut store = self.store.write().await;
        store.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.ensure_connected()?;
        let mut store = self.store.write().await;
        store.remove(key);
        Ok(())
    }
}
