//! Synthetic dataset loading.
//!
//! Drives the pure builders from `ugcbench_core::generator` and writes their
//! output to a store in batches.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use ugcbench_core::generator::{
    batch_ranges, movie_batch, user_activity, user_batch, ActivityPlan, GenerationSummary,
};
use ugcbench_core::storage::{Result, StoreRepository};

use crate::config::BenchmarkConfig;

/// Populates a store with users, movies and per-user activity.
///
/// Any store error aborts generation; nothing is retried.
pub struct DataGenerator {
    store: Arc<dyn StoreRepository>,
    num_users: usize,
    num_movies: usize,
    batch_size: usize,
    plan: ActivityPlan,
    seed: Option<u64>,
}

impl DataGenerator {
    pub fn new(store: Arc<dyn StoreRepository>, config: &BenchmarkConfig) -> Self {
        Self {
            store,
            num_users: config.num_users,
            num_movies: config.num_movies,
            batch_size: config.batch_size.max(1),
            plan: ActivityPlan {
                likes_per_user: config.likes_per_user,
                bookmarks_per_user: config.bookmarks_per_user,
                reviews_per_user: config.reviews_per_user,
            },
            seed: config.seed,
        }
    }

    /// Loads the full dataset. The store must already be connected.
    ///
    /// With a seed, movie picks and ratings are reproducible; entity IDs are
    /// always fresh.
    pub async fn generate(&self) -> Result<GenerationSummary> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut summary = GenerationSummary::default();

        tracing::info!(count = self.num_users, "Loading users");
        for range in batch_ranges(self.num_users, self.batch_size) {
            summary.users += self.store.bulk_insert_users(&user_batch(range)).await?;
        }

        tracing::info!(count = self.num_movies, "Loading movies");
        for range in batch_ranges(self.num_movies, self.batch_size) {
            summary.movies += self.store.bulk_insert_movies(&movie_batch(range)).await?;
        }

        let movie_ids = self.all_movie_ids().await?;
        tracing::debug!(count = movie_ids.len(), "Fetched movie ids");

        tracing::info!(plan = ?self.plan, "Loading user activity");
        let mut offset = 0;
        loop {
            let user_ids = self.store.list_user_ids(offset, self.batch_size).await?;
            if user_ids.is_empty() {
                break;
            }
            offset += user_ids.len();

            for &user_id in &user_ids {
                let activity = user_activity(user_id, &movie_ids, &self.plan, &mut rng);
                summary.likes += self.store.bulk_insert_likes(&activity.likes).await?;
                summary.bookmarks += self.store.bulk_insert_bookmarks(&activity.bookmarks).await?;
                summary.reviews += self.store.bulk_insert_reviews(&activity.reviews).await?;
                summary.review_likes += self
                    .store
                    .bulk_insert_review_likes(&activity.review_likes)
                    .await?;
            }
            tracing::debug!(users = offset, "Flushed user activity");

            if user_ids.len() < self.batch_size {
                break;
            }
        }

        tracing::info!(
            users = summary.users,
            movies = summary.movies,
            likes = summary.likes,
            bookmarks = summary.bookmarks,
            reviews = summary.reviews,
            review_likes = summary.review_likes,
            "Data generation finished"
        );
        Ok(summary)
    }

    async fn all_movie_ids(&self) -> Result<Vec<Uuid>> {
        let mut ids = Vec::new();
        loop {
            let page = self.store.list_movie_ids(ids.len(), self.batch_size).await?;
            let done = page.len() < self.batch_size;
            ids.extend(page);
            if done {
                return Ok(ids);
            }
        }
    }
}
