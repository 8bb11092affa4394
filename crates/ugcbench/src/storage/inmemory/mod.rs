//! In-memory storage backend.
//!
//! Stores all data in HashMaps wrapped in `Arc<RwLock<_>>`. Useful for tests
//! and for benchmarking the harness itself without a database.
//!
//! # Example
//!
//! ```rust,ignore
//! use ugcbench::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! repo.connect().await?;
//! ```

mod repository;

pub use repository::InMemoryRepository;
