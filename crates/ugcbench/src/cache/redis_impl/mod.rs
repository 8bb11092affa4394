//! Redis cache backend implementation.
//!
//! Provides an out-of-process cache using Redis through a connection manager.

mod cache;
mod error;

pub use cache::RedisCache;
