//! In-memory cache backend implementation.
//!
//! Provides a thread-safe, unbounded in-process cache.

mod cache;

pub use cache::MemoryCache;
