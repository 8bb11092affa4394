//! Benchmark orchestration.
//!
//! [`BenchmarkRunner`] walks a run through its stages in order:
//!
//! ```text
//! Uninitialized -> DependenciesBuilt -> Connected -> DataGenerated
//!     -> CacheWarmed (optional) -> BenchmarksRun -> TornDown
//! ```
//!
//! Teardown runs whatever happened before it.

use std::collections::HashSet;
use std::sync::Arc;

use ugcbench_core::bench::{
    BenchmarkReport, CaseKind, Fixtures, RealtimeReport, StaticReadReport, WarmUpSummary,
};
use ugcbench_core::cache::CacheRepository;
use ugcbench_core::domain::{bookmarks_projection, likes_projection};
use ugcbench_core::generator::GenerationSummary;
use ugcbench_core::storage::StoreRepository;
use uuid::Uuid;

use crate::cache::build_cache;
use crate::cases;
use crate::config::{BackendConfig, BenchmarkConfig};
use crate::error::{BenchmarkError, Result};
use crate::generator::DataGenerator;
use crate::storage::build_store;

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunnerStage {
    Uninitialized,
    DependenciesBuilt,
    Connected,
    DataGenerated,
    CacheWarmed,
    BenchmarksRun,
    TornDown,
}

/// Drives one benchmark run against a store and an optional cache.
pub struct BenchmarkRunner {
    config: BenchmarkConfig,
    backends: BackendConfig,
    store: Option<Arc<dyn StoreRepository>>,
    cache: Option<Arc<dyn CacheRepository>>,
    injected: bool,
    stage: RunnerStage,
    generation: GenerationSummary,
    warm_up: Option<WarmUpSummary>,
    fixtures: Option<Fixtures>,
}

impl BenchmarkRunner {
    /// Creates a runner that builds its backends from `backends`.
    pub fn new(config: BenchmarkConfig, backends: BackendConfig) -> Self {
        Self {
            config,
            backends,
            store: None,
            cache: None,
            injected: false,
            stage: RunnerStage::Uninitialized,
            generation: GenerationSummary::default(),
            warm_up: None,
            fixtures: None,
        }
    }

    /// Creates a runner over already built, not yet connected, backends.
    pub fn with_dependencies(
        config: BenchmarkConfig,
        store: Arc<dyn StoreRepository>,
        cache: Option<Arc<dyn CacheRepository>>,
    ) -> Self {
        Self {
            config,
            backends: BackendConfig::in_memory(),
            store: Some(store),
            cache,
            injected: true,
            stage: RunnerStage::Uninitialized,
            generation: GenerationSummary::default(),
            warm_up: None,
            fixtures: None,
        }
    }

    pub fn stage(&self) -> RunnerStage {
        self.stage
    }

    /// Runs every stage and tears down regardless of the outcome.
    ///
    /// A teardown failure is reported only when the run itself succeeded.
    pub async fn run(&mut self) -> Result<BenchmarkReport> {
        let outcome = self.run_stages().await;
        let teardown = self.teardown().await;

        match outcome {
            Ok(report) => {
                teardown?;
                Ok(report)
            }
            Err(err) => {
                tracing::error!(error = %err, stage = ?self.stage, "Benchmark run failed");
                Err(err)
            }
        }
    }

    async fn run_stages(&mut self) -> Result<BenchmarkReport> {
        self.setup_dependencies()?;
        self.connect().await?;
        self.generate().await?;
        self.warm_up().await?;
        self.run_benchmarks().await
    }

    /// Builds the store and cache from the backend configuration.
    pub fn setup_dependencies(&mut self) -> Result<()> {
        if self.injected {
            tracing::debug!("Using injected dependencies");
        } else {
            tracing::info!(
                store = ?self.backends.store,
                cache = ?self.backends.cache,
                "Building backends"
            );
            self.store = Some(build_store(&self.backends.store)?);
            self.cache = build_cache(&self.backends.cache)?;
        }
        self.stage = RunnerStage::DependenciesBuilt;
        Ok(())
    }

    /// Connects the store, then the cache when one is configured.
    pub async fn connect(&mut self) -> Result<()> {
        self.store()?.connect().await?;
        if let Some(cache) = &self.cache {
            cache.connect().await?;
        }
        tracing::info!(cache = self.cache.is_some(), "Backends connected");
        self.stage = RunnerStage::Connected;
        Ok(())
    }

    /// Loads the synthetic dataset into the store.
    pub async fn generate(&mut self) -> Result<GenerationSummary> {
        let generator = DataGenerator::new(self.store()?, &self.config);
        self.generation = generator.generate().await?;
        self.stage = RunnerStage::DataGenerated;
        Ok(self.generation)
    }

    /// Picks the user, movie and review the cases run against.
    ///
    /// The choice is made once per run and reused by later calls.
    pub async fn select_fixtures(&mut self) -> Result<Fixtures> {
        if let Some(fixtures) = self.fixtures {
            return Ok(fixtures);
        }
        let store = self.store()?;

        let user_id = store
            .get_random_user_id()
            .await?
            .ok_or(BenchmarkError::MissingFixture("user"))?;
        let movie_id = store
            .get_random_movie_id()
            .await?
            .ok_or(BenchmarkError::MissingFixture("movie"))?;
        let review_id = store.get_random_review_id().await?;

        let fixtures = Fixtures {
            user_id,
            movie_id,
            review_id,
        };
        tracing::info!(%user_id, %movie_id, ?review_id, "Fixtures selected");
        self.fixtures = Some(fixtures);
        Ok(fixtures)
    }

    /// Loads projections of the fixtures, then of a sample of entities, into
    /// the cache.
    ///
    /// Returns `None` when warm-up is disabled or no cache is configured.
    pub async fn warm_up(&mut self) -> Result<Option<WarmUpSummary>> {
        let cache = match &self.cache {
            Some(cache) if self.config.cache_warmup_enabled => cache.clone(),
            _ => {
                tracing::info!("Skipping cache warm-up");
                return Ok(None);
            }
        };
        let fixtures = self.select_fixtures().await?;
        let store = self.store()?;
        let sample = self.config.warmup_sample_size;
        let mut summary = WarmUpSummary::default();

        let user_ids = fixtures_first(Some(fixtures.user_id), store.sample_user_ids(sample).await?);
        for user_id in user_ids {
            let likes = store.get_user_likes(user_id).await?;
            cache
                .warm_up_user_likes(user_id, &likes_projection(&likes))
                .await?;
            let bookmarks = store.get_user_bookmarks(user_id).await?;
            cache
                .warm_up_user_bookmarks(user_id, &bookmarks_projection(&bookmarks))
                .await?;
            summary.users += 1;
        }

        let movie_ids =
            fixtures_first(Some(fixtures.movie_id), store.sample_movie_ids(sample).await?);
        for movie_id in movie_ids {
            let stats = store.get_movie_stats(movie_id).await?;
            cache.warm_up_movie_stats(movie_id, &stats).await?;
            summary.movies += 1;
        }

        let review_ids = fixtures_first(fixtures.review_id, store.sample_review_ids(sample).await?);
        for review_id in review_ids {
            let stats = store.get_review_stats(review_id).await?;
            cache.warm_up_review_stats(review_id, &stats).await?;
            summary.reviews += 1;
        }

        tracing::info!(
            users = summary.users,
            movies = summary.movies,
            reviews = summary.reviews,
            "Cache warmed up"
        );
        self.warm_up = Some(summary);
        self.stage = RunnerStage::CacheWarmed;
        Ok(Some(summary))
    }

    /// Runs the enabled cases against the selected fixtures.
    pub async fn run_benchmarks(&mut self) -> Result<BenchmarkReport> {
        let fixtures = self.select_fixtures().await?;
        let Fixtures {
            user_id,
            movie_id,
            review_id,
        } = fixtures;
        let store = self.store()?;
        let cache = self.cache.clone();
        let cache = cache.as_deref();
        let iterations = self.config.num_iterations_per_test;
        tracing::info!(iterations, "Running benchmarks");

        let mut static_reads = Vec::new();
        if self.config.run_static_read_tests {
            let mut likes = Vec::with_capacity(iterations);
            let mut stats = Vec::with_capacity(iterations);
            let mut bookmarks = Vec::with_capacity(iterations);
            for _ in 0..iterations {
                likes.push(cases::user_likes_list(store.as_ref(), cache, user_id).await?);
                stats.push(cases::movie_stats(store.as_ref(), cache, movie_id).await?);
                bookmarks.push(cases::user_bookmarks_list(store.as_ref(), cache, user_id).await?);
            }
            static_reads.push(StaticReadReport::from_samples(CaseKind::UserLikesList, likes));
            static_reads.push(StaticReadReport::from_samples(CaseKind::MovieStats, stats));
            static_reads.push(StaticReadReport::from_samples(
                CaseKind::UserBookmarksList,
                bookmarks,
            ));
        }

        let mut realtime = Vec::new();
        if self.config.run_realtime_tests {
            let mut samples = Vec::with_capacity(iterations);
            for _ in 0..iterations {
                samples.push(cases::realtime_like(store.as_ref(), cache, user_id, movie_id).await?);
            }
            realtime.push(RealtimeReport::from_samples(CaseKind::RealtimeLike, samples));

            match review_id {
                Some(review_id) => {
                    let mut samples = Vec::with_capacity(iterations);
                    for _ in 0..iterations {
                        samples.push(
                            cases::realtime_review_like(store.as_ref(), cache, user_id, review_id)
                                .await?,
                        );
                    }
                    realtime.push(RealtimeReport::from_samples(
                        CaseKind::RealtimeReviewLike,
                        samples,
                    ));
                }
                None => tracing::warn!("No review available; skipping realtime review case"),
            }
        }

        self.stage = RunnerStage::BenchmarksRun;
        Ok(BenchmarkReport {
            generation: self.generation,
            warm_up: self.warm_up,
            fixtures,
            static_reads,
            realtime,
        })
    }

    /// Closes the store and the cache.
    ///
    /// Both are attempted even if the first fails; the first error is returned.
    pub async fn teardown(&mut self) -> Result<()> {
        let mut first_error = None;

        if let Some(store) = &self.store {
            if let Err(err) = store.close().await {
                tracing::warn!(error = %err, "Failed to close store");
                first_error.get_or_insert(BenchmarkError::from(err));
            }
        }
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.close().await {
                tracing::warn!(error = %err, "Failed to close cache");
                first_error.get_or_insert(BenchmarkError::from(err));
            }
        }

        self.stage = RunnerStage::TornDown;
        tracing::info!("Teardown complete");
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn store(&self) -> Result<Arc<dyn StoreRepository>> {
        self.store.clone().ok_or_else(|| {
            BenchmarkError::InvalidConfig("store has not been built".to_string())
        })
    }
}

/// Puts the fixture id first and drops repeats from the sample.
fn fixtures_first(fixture: Option<Uuid>, sample: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    fixture
        .into_iter()
        .chain(sample)
        .filter(|id| seen.insert(*id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ugcbench_core::storage::{RepositoryError, StoreConnection, UserRepository};

    use crate::cache::{MemoryCache, ProjectionCache};
    use crate::storage::InMemoryRepository;

    fn config(users: usize, movies: usize, per_user: usize) -> BenchmarkConfig {
        BenchmarkConfig {
            num_users: users,
            num_movies: movies,
            likes_per_user: per_user,
            bookmarks_per_user: per_user,
            reviews_per_user: per_user,
            num_iterations_per_test: 2,
            cache_warmup_enabled: true,
            run_static_read_tests: true,
            run_realtime_tests: true,
            batch_size: 4,
            warmup_sample_size: 100,
            seed: Some(11),
        }
    }

    fn memory_cache() -> Option<Arc<dyn CacheRepository>> {
        Some(Arc::new(ProjectionCache::new(MemoryCache::new())))
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let store = Arc::new(InMemoryRepository::new());
        let mut runner =
            BenchmarkRunner::with_dependencies(config(10, 10, 3), store.clone(), memory_cache());

        let report = runner.run().await.unwrap();

        assert_eq!(runner.stage(), RunnerStage::TornDown);
        assert_eq!(report.generation.likes, 30);
        assert_eq!(
            report.warm_up,
            Some(WarmUpSummary {
                users: 10,
                movies: 10,
                reviews: 30,
            })
        );
        assert!(report.fixtures.review_id.is_some());

        let likes = report.static_read(CaseKind::UserLikesList).unwrap();
        assert_eq!(likes.samples.len(), 2);
        assert_eq!(likes.cache_hits, 2);

        let realtime = report.realtime_case(CaseKind::RealtimeLike).unwrap();
        for sample in &realtime.samples {
            assert_eq!(sample.durations().len(), 4);
            assert_eq!(sample.read_cache_hit, Some(false));
        }
        assert_eq!(realtime.read_cache_hits, 0);
        assert!(report.realtime_case(CaseKind::RealtimeReviewLike).is_some());
    }

    #[tokio::test]
    async fn test_warm_up_covers_fixtures_beyond_sample() {
        let mut config = config(200, 200, 2);
        config.warmup_sample_size = 2;
        config.batch_size = 50;
        let store = Arc::new(InMemoryRepository::new());
        let mut runner = BenchmarkRunner::with_dependencies(config, store, memory_cache());

        let report = runner.run().await.unwrap();

        for case in [
            CaseKind::UserLikesList,
            CaseKind::MovieStats,
            CaseKind::UserBookmarksList,
        ] {
            let read = report.static_read(case).unwrap();
            assert_eq!(read.samples[0].cache_hit, Some(true), "{case}");
            assert_eq!(read.cache_hits, read.samples.len(), "{case}");
        }
        let warm_up = report.warm_up.unwrap();
        assert!((2..=3).contains(&warm_up.users));
        assert!((2..=3).contains(&warm_up.movies));
    }

    #[tokio::test]
    async fn test_fixtures_are_selected_once() {
        let store = Arc::new(InMemoryRepository::new());
        let mut runner =
            BenchmarkRunner::with_dependencies(config(20, 20, 1), store, memory_cache());
        runner.setup_dependencies().unwrap();
        runner.connect().await.unwrap();
        runner.generate().await.unwrap();

        let first = runner.select_fixtures().await.unwrap();
        runner.warm_up().await.unwrap();
        let report = runner.run_benchmarks().await.unwrap();

        assert_eq!(report.fixtures, first);
        runner.teardown().await.unwrap();
    }

    #[test]
    fn test_fixtures_first_dedupes_sample() {
        let fixture = Uuid::new_v4();
        let other = Uuid::new_v4();

        let ids = fixtures_first(Some(fixture), vec![other, fixture]);

        assert_eq!(ids, vec![fixture, other]);
        assert_eq!(fixtures_first(None, vec![other]), vec![other]);
    }

    #[tokio::test]
    async fn test_run_without_warm_up_reads_miss() {
        let mut config = config(5, 5, 2);
        config.cache_warmup_enabled = false;
        config.run_realtime_tests = false;
        let store = Arc::new(InMemoryRepository::new());
        let mut runner = BenchmarkRunner::with_dependencies(config, store, memory_cache());

        let report = runner.run().await.unwrap();

        assert_eq!(report.warm_up, None);
        assert!(report.realtime.is_empty());
        let first = &report.static_read(CaseKind::UserLikesList).unwrap().samples[0];
        assert_eq!(first.cache_hit, Some(false));
    }

    #[tokio::test]
    async fn test_run_without_cache() {
        let store = Arc::new(InMemoryRepository::new());
        let mut runner = BenchmarkRunner::with_dependencies(config(3, 3, 1), store, None);

        let report = runner.run().await.unwrap();

        assert_eq!(report.warm_up, None);
        let stats = report.static_read(CaseKind::MovieStats).unwrap();
        assert!(stats.cache.is_none());
        assert!(stats.db.is_some());
    }

    #[tokio::test]
    async fn test_empty_population_is_missing_fixture_and_tears_down() {
        let store = Arc::new(InMemoryRepository::new());
        let mut runner =
            BenchmarkRunner::with_dependencies(config(0, 0, 3), store.clone(), memory_cache());

        let result = runner.run().await;

        assert!(matches!(result, Err(BenchmarkError::MissingFixture("user"))));
        assert_eq!(runner.stage(), RunnerStage::TornDown);
        assert!(matches!(
            store.count_users().await,
            Err(RepositoryError::StoreUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_movie_fixture() {
        let store = Arc::new(InMemoryRepository::new());
        let mut runner = BenchmarkRunner::with_dependencies(config(2, 0, 1), store, None);

        let result = runner.run().await;

        assert!(matches!(result, Err(BenchmarkError::MissingFixture("movie"))));
    }

    #[tokio::test]
    async fn test_stages_advance_in_order() {
        let store = Arc::new(InMemoryRepository::new());
        let mut runner =
            BenchmarkRunner::with_dependencies(config(2, 2, 1), store.clone(), memory_cache());
        assert_eq!(runner.stage(), RunnerStage::Uninitialized);

        runner.setup_dependencies().unwrap();
        assert_eq!(runner.stage(), RunnerStage::DependenciesBuilt);
        runner.connect().await.unwrap();
        assert_eq!(runner.stage(), RunnerStage::Connected);
        runner.generate().await.unwrap();
        assert_eq!(runner.stage(), RunnerStage::DataGenerated);
        runner.warm_up().await.unwrap();
        assert_eq!(runner.stage(), RunnerStage::CacheWarmed);
        runner.run_benchmarks().await.unwrap();
        assert_eq!(runner.stage(), RunnerStage::BenchmarksRun);
        runner.teardown().await.unwrap();
        assert_eq!(runner.stage(), RunnerStage::TornDown);

        store.connect().await.unwrap();
        assert_eq!(store.count_users().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_backends_built_from_config() {
        let mut config = config(2, 2, 1);
        config.run_realtime_tests = false;
        let mut runner = BenchmarkRunner::new(config, BackendConfig::in_memory());

        let report = runner.run().await.unwrap();

        assert_eq!(report.generation.users, 2);
        assert_eq!(report.static_reads.len(), 3);
    }
}
