use std::env;

use crate::error::{BenchmarkError, Result};

/// Benchmark configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkConfig {
    /// Users to generate (default: 500,000)
    pub num_users: usize,
    /// Movies to generate (default: 500,000)
    pub num_movies: usize,
    /// Distinct movies each user rates (default: 25)
    pub likes_per_user: usize,
    /// Distinct movies each user bookmarks (default: 25)
    pub bookmarks_per_user: usize,
    /// Reviews each user writes (default: 25)
    pub reviews_per_user: usize,
    /// Times each case is repeated (default: 5)
    pub num_iterations_per_test: usize,
    /// Load projections into the cache before the cases run (default: true)
    pub cache_warmup_enabled: bool,
    /// Run the three static read cases (default: true)
    pub run_static_read_tests: bool,
    /// Run the two realtime write cases (default: true)
    pub run_realtime_tests: bool,
    /// Rows per bulk insert and per id page (default: 10,000)
    pub batch_size: usize,
    /// Users, movies and reviews warmed up, each (default: 1,000)
    pub warmup_sample_size: usize,
    /// Seed for reproducible datasets (default: unset, fresh entropy)
    pub seed: Option<u64>,
}

impl BenchmarkConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `NUM_USERS` - Users to generate (default: 500,000)
    /// - `NUM_MOVIES` - Movies to generate (default: 500,000)
    /// - `LIKES_PER_USER` - Ratings per user (default: 25)
    /// - `BOOKMARKS_PER_USER` - Bookmarks per user (default: 25)
    /// - `REVIEWS_PER_USER` - Reviews per user (default: 25)
    /// - `NUM_ITERATIONS_PER_TEST` - Repetitions per case (default: 5)
    /// - `CACHE_WARMUP_ENABLED` - Warm the cache up first (default: true)
    /// - `RUN_STATIC_READ_TESTS` - Run static read cases (default: true)
    /// - `RUN_REALTIME_TESTS` - Run realtime cases (default: true)
    /// - `BATCH_SIZE` - Bulk insert batch size (default: 10,000)
    /// - `WARMUP_SAMPLE_SIZE` - Entities warmed per kind (default: 1,000)
    /// - `SEED` - RNG seed for data generation (default: unset)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |name: &str, default: usize| {
            lookup(name)
                .and_then(|v| v.trim().replace('_', "").parse().ok())
                .unwrap_or(default)
        };
        let flag = |name: &str, default: bool| {
            lookup(name)
                .and_then(|v| parse_flag(&v))
                .unwrap_or(default)
        };

        Self {
            num_users: number("NUM_USERS", 500_000),
            num_movies: number("NUM_MOVIES", 500_000),
            likes_per_user: number("LIKES_PER_USER", 25),
            bookmarks_per_user: number("BOOKMARKS_PER_USER", 25),
            reviews_per_user: number("REVIEWS_PER_USER", 25),
            num_iterations_per_test: number("NUM_ITERATIONS_PER_TEST", 5),
            cache_warmup_enabled: flag("CACHE_WARMUP_ENABLED", true),
            run_static_read_tests: flag("RUN_STATIC_READ_TESTS", true),
            run_realtime_tests: flag("RUN_REALTIME_TESTS", true),
            batch_size: number("BATCH_SIZE", 10_000),
            warmup_sample_size: number("WARMUP_SAMPLE_SIZE", 1_000),
            seed: lookup("SEED").and_then(|v| v.trim().parse().ok()),
        }
    }

    /// Rejects settings the runner cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(BenchmarkError::InvalidConfig(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Persistent store to benchmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    InMemory,
    Sqlite { path: String },
}

/// Cache to benchmark against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    /// Store-only run; every cache measurement is skipped.
    None,
    Memory,
    Redis { url: String },
}

/// Which backends a run builds.
///
/// The binary fills this from `--store`/`--cache` and their env fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub store: StoreBackend,
    pub cache: CacheBackend,
}

impl BackendConfig {
    /// In-memory store and cache.
    pub fn in_memory() -> Self {
        Self {
            store: StoreBackend::InMemory,
            cache: CacheBackend::Memory,
        }
    }
}
