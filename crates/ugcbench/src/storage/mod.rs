//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `ugcbench_core::storage`. The backend is chosen at runtime from
//! [`StoreBackend`]; compiled-in backends are controlled by feature flags.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//!
//! The in-memory backend is always available.

use std::sync::Arc;

use ugcbench_core::storage::StoreRepository;

use crate::config::StoreBackend;
use crate::error::Result;

pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;

/// Builds a disconnected store for the configured backend.
///
/// Fails with `InvalidConfig` when the backend was not compiled in.
pub fn build_store(backend: &StoreBackend) -> Result<Arc<dyn StoreRepository>> {
    match backend {
        StoreBackend::InMemory => Ok(Arc::new(InMemoryRepository::new())),
        #[cfg(feature = "sqlite")]
        StoreBackend::Sqlite { path } => Ok(Arc::new(SqliteRepository::new(path.clone()))),
        #[cfg(not(feature = "sqlite"))]
        StoreBackend::Sqlite { .. } => Err(crate::error::BenchmarkError::InvalidConfig(
            "SQLite store requested but the `sqlite` feature is disabled".to_string(),
        )),
    }
}
