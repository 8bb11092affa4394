//! Latency and staleness benchmark for a persistent store against a cache.
//!
//! The crate wires the traits from `ugcbench_core` to concrete backends,
//! loads a synthetic movie-rating dataset and times the same operations on
//! both sides. [`runner::BenchmarkRunner`] is the entry point.

pub mod cache;
pub mod cases;
pub mod config;
pub mod error;
pub mod generator;
pub mod runner;
pub mod storage;

pub use config::{BackendConfig, BenchmarkConfig, CacheBackend, StoreBackend};
pub use error::{BenchmarkError, Result};
pub use runner::{BenchmarkRunner, RunnerStage};
