//! Cache backend implementations.
//!
//! This module provides concrete implementations of the `Cache` engine trait
//! defined in `ugcbench_core::cache`, and [`ProjectionCache`], the typed
//! `CacheRepository` that runs on top of any engine.
//!
//! # Feature Flags
//!
//! - `redis`: Redis cache using the redis crate
//!
//! The in-memory cache is always available.

use std::sync::Arc;

use ugcbench_core::cache::CacheRepository;

use crate::config::CacheBackend;
use crate::error::Result;

pub mod memory;
mod projection;

#[cfg(feature = "redis")]
pub mod redis_impl;

pub use memory::MemoryCache;
pub use projection::ProjectionCache;

#[cfg(feature = "redis")]
pub use redis_impl::RedisCache;

/// Builds a disconnected cache for the configured backend.
///
/// Returns `None` for [`CacheBackend::None`]: the run measures the store only.
pub fn build_cache(backend: &CacheBackend) -> Result<Option<Arc<dyn CacheRepository>>> {
    match backend {
        CacheBackend::None => Ok(None),
        CacheBackend::Memory => Ok(Some(Arc::new(ProjectionCache::new(MemoryCache::new())))),
        #[cfg(feature = "redis")]
        CacheBackend::Redis { url } => {
            Ok(Some(Arc::new(ProjectionCache::new(RedisCache::new(url.clone())))))
        }
        #[cfg(not(feature = "redis"))]
        CacheBackend::Redis { .. } => Err(crate::error::BenchmarkError::InvalidConfig(
            "Redis cache requested but the `redis` feature is disabled".to_string(),
        )),
    }
}
