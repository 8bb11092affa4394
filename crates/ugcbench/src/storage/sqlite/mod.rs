//! SQLite storage backend implementation.
//!
//! Uses `rusqlite` for synchronous operations and `tokio-rusqlite` for async
//! wrapping. SQL text lives in `schema`, row mapping in `conversions`.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
