use thiserror::Error;

use ugcbench_core::cache::CacheError;
use ugcbench_core::storage::RepositoryError;

/// Errors that abort a benchmark run.
#[derive(Debug, Error)]
pub enum BenchmarkError {
    #[error("Store error: {0}")]
    Store(#[from] RepositoryError),
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
    /// The store holds no entity of the named kind.
    #[error("No {0} available to benchmark against")]
    MissingFixture(&'static str),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for benchmark operations.
pub type Result<T> = std::result::Result<T, BenchmarkError>;
