//! Benchmark cases.
//!
//! Each case runs the same logical operation against the store and, when one
//! is configured, the cache, and reports wall-clock durations in seconds. Cases
//! never open connections and never assert on the values they read.

use std::future::Future;
use std::time::Instant;

use uuid::Uuid;

use ugcbench_core::bench::{CaseKind, RealtimeTiming, StaticReadTiming};
use ugcbench_core::cache::CacheRepository;
use ugcbench_core::domain::{Like, ReviewLike};
use ugcbench_core::generator::random_rating;
use ugcbench_core::storage::StoreRepository;

use crate::error::Result;

/// Awaits `future` and returns its output with the elapsed seconds.
async fn timed<F>(future: F) -> (F::Output, f64)
where
    F: Future,
{
    let start = Instant::now();
    let output = future.await;
    (output, start.elapsed().as_secs_f64())
}

fn millis(secs: Option<f64>) -> Option<f64> {
    secs.map(|s| s * 1_000.0)
}

fn log_static(case: CaseKind, timing: &StaticReadTiming) {
    tracing::info!(
        case = %case,
        db_ms = timing.db_secs * 1_000.0,
        cache_ms = millis(timing.cache_secs),
        cache_hit = timing.cache_hit,
        "Static read measured"
    );
}

fn log_realtime(case: CaseKind, timing: &RealtimeTiming) {
    tracing::info!(
        case = %case,
        write_ms = timing.write_secs * 1_000.0,
        cache_update_ms = millis(timing.cache_update_secs),
        read_db_ms = timing.read_db_secs * 1_000.0,
        read_cache_ms = millis(timing.read_cache_secs),
        read_cache_hit = timing.read_cache_hit,
        "Realtime write measured"
    );
}

/// Reads every rating of a user from the store and from the cache.
pub async fn user_likes_list(
    store: &dyn StoreRepository,
    cache: Option<&dyn CacheRepository>,
    user_id: Uuid,
) -> Result<StaticReadTiming> {
    let (likes, db_secs) = timed(store.get_user_likes(user_id)).await;
    likes?;

    let (cache_secs, cache_hit) = match cache {
        Some(cache) => {
            let (cached, secs) = timed(cache.get_user_likes(user_id)).await;
            (Some(secs), Some(cached?.is_some()))
        }
        None => (None, None),
    };

    let timing = StaticReadTiming {
        db_secs,
        cache_secs,
        cache_hit,
    };
    log_static(CaseKind::UserLikesList, &timing);
    Ok(timing)
}

/// Reads a movie's aggregated ratings from the store and from the cache.
pub async fn movie_stats(
    store: &dyn StoreRepository,
    cache: Option<&dyn CacheRepository>,
    movie_id: Uuid,
) -> Result<StaticReadTiming> {
    let (stats, db_secs) = timed(store.get_movie_stats(movie_id)).await;
    stats?;

    let (cache_secs, cache_hit) = match cache {
        Some(cache) => {
            let (cached, secs) = timed(cache.get_movie_stats(movie_id)).await;
            (Some(secs), Some(cached?.is_some()))
        }
        None => (None, None),
    };

    let timing = StaticReadTiming {
        db_secs,
        cache_secs,
        cache_hit,
    };
    log_static(CaseKind::MovieStats, &timing);
    Ok(timing)
}

/// Reads every bookmark of a user from the store and from the cache.
pub async fn user_bookmarks_list(
    store: &dyn StoreRepository,
    cache: Option<&dyn CacheRepository>,
    user_id: Uuid,
) -> Result<StaticReadTiming> {
    let (bookmarks, db_secs) = timed(store.get_user_bookmarks(user_id)).await;
    bookmarks?;

    let (cache_secs, cache_hit) = match cache {
        Some(cache) => {
            let (cached, secs) = timed(cache.get_user_bookmarks(user_id)).await;
            (Some(secs), Some(cached?.is_some()))
        }
        None => (None, None),
    };

    let timing = StaticReadTiming {
        db_secs,
        cache_secs,
        cache_hit,
    };
    log_static(CaseKind::UserBookmarksList, &timing);
    Ok(timing)
}

/// Writes a random rating for a movie, then reads the movie's aggregate back.
///
/// The cache side patches the user's likes projection and invalidates the
/// movie's stats, so the final cache read is expected to miss.
pub async fn realtime_like(
    store: &dyn StoreRepository,
    cache: Option<&dyn CacheRepository>,
    user_id: Uuid,
    movie_id: Uuid,
) -> Result<RealtimeTiming> {
    let rating = random_rating(&mut rand::rng());
    let like = Like::new(user_id, movie_id, rating);

    let (written, write_secs) = timed(store.add_or_update_like(&like)).await;
    written?;

    let cache_update_secs = match cache {
        Some(cache) => {
            let (updated, secs) = timed(async {
                cache.update_user_like(user_id, movie_id, rating).await?;
                cache.invalidate_movie_stats(movie_id).await
            })
            .await;
            updated?;
            Some(secs)
        }
        None => None,
    };

    let (stats, read_db_secs) = timed(store.get_movie_stats(movie_id)).await;
    stats?;

    let (read_cache_secs, read_cache_hit) = match cache {
        Some(cache) => {
            let (cached, secs) = timed(cache.get_movie_stats(movie_id)).await;
            (Some(secs), Some(cached?.is_some()))
        }
        None => (None, None),
    };

    let timing = RealtimeTiming {
        write_secs,
        cache_update_secs,
        read_db_secs,
        read_cache_secs,
        read_cache_hit,
    };
    log_realtime(CaseKind::RealtimeLike, &timing);
    Ok(timing)
}

/// Writes a random rating for a review, then reads the review's aggregate back.
///
/// No per-user projection exists for review ratings; the cache side only
/// invalidates the review's stats.
pub async fn realtime_review_like(
    store: &dyn StoreRepository,
    cache: Option<&dyn CacheRepository>,
    user_id: Uuid,
    review_id: Uuid,
) -> Result<RealtimeTiming> {
    let rating = random_rating(&mut rand::rng());
    let review_like = ReviewLike::new(user_id, review_id, rating);

    let (written, write_secs) = timed(store.add_or_update_review_like(&review_like)).await;
    written?;

    let cache_update_secs = match cache {
        Some(cache) => {
            let (invalidated, secs) = timed(cache.invalidate_review_stats(review_id)).await;
            invalidated?;
            Some(secs)
        }
        None => None,
    };

    let (stats, read_db_secs) = timed(store.get_review_stats(review_id)).await;
    stats?;

    let (read_cache_secs, read_cache_hit) = match cache {
        Some(cache) => {
            let (cached, secs) = timed(cache.get_review_stats(review_id)).await;
            (Some(secs), Some(cached?.is_some()))
        }
        None => (None, None),
    };

    let timing = RealtimeTiming {
        write_secs,
        cache_update_secs,
        read_db_secs,
        read_cache_secs,
        read_cache_hit,
    };
    log_realtime(CaseKind::RealtimeReviewLike, &timing);
    Ok(timing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use ugcbench_core::domain::{MovieStats, Review, ReviewStats};
    use ugcbench_core::storage::{LikeRepository, ReviewRepository, StoreConnection};

    use crate::cache::{MemoryCache, ProjectionCache};
    use crate::error::BenchmarkError;
    use crate::storage::InMemoryRepository;

    async fn backends() -> (InMemoryRepository, ProjectionCache<MemoryCache>) {
        let store = InMemoryRepository::new();
        store.connect().await.unwrap();
        let cache = ProjectionCache::new(MemoryCache::new());
        cache.connect().await.unwrap();
        (store, cache)
    }

    #[tokio::test]
    async fn test_user_likes_list_hit_after_warm_up() {
        let (store, cache) = backends().await;
        let user_id = Uuid::new_v4();
        cache
            .warm_up_user_likes(user_id, &HashMap::from([(Uuid::new_v4(), 5)]))
            .await
            .unwrap();

        let timing = user_likes_list(&store, Some(&cache), user_id).await.unwrap();

        assert_eq!(timing.cache_hit, Some(true));
        assert!(timing.cache_secs.is_some());
        assert!(timing.db_secs >= 0.0);
    }

    #[tokio::test]
    async fn test_user_bookmarks_list_miss_without_warm_up() {
        let (store, cache) = backends().await;

        let timing = user_bookmarks_list(&store, Some(&cache), Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(timing.cache_hit, Some(false));
    }

    #[tokio::test]
    async fn test_static_case_without_cache() {
        let (store, _) = backends().await;

        let timing = movie_stats(&store, None, Uuid::new_v4()).await.unwrap();

        assert_eq!(timing.cache_secs, None);
        assert_eq!(timing.cache_hit, None);
    }

    #[tokio::test]
    async fn test_realtime_like_invalidates_movie_stats() {
        let (store, cache) = backends().await;
        let user_id = Uuid::new_v4();
        let movie_id = Uuid::new_v4();
        cache
            .warm_up_user_likes(user_id, &HashMap::new())
            .await
            .unwrap();
        cache
            .warm_up_movie_stats(movie_id, &MovieStats::default())
            .await
            .unwrap();

        let timing = realtime_like(&store, Some(&cache), user_id, movie_id)
            .await
            .unwrap();

        assert_eq!(timing.durations().len(), 4);
        assert_eq!(timing.read_cache_hit, Some(false));

        let likes = store.get_user_likes(user_id).await.unwrap();
        assert_eq!(likes.len(), 1);
        let projection = cache.get_user_likes(user_id).await.unwrap().unwrap();
        assert_eq!(projection.likes.get(&movie_id), Some(&likes[0].rating));
    }

    #[tokio::test]
    async fn test_realtime_like_without_cache_measures_store_only() {
        let (store, _) = backends().await;

        let timing = realtime_like(&store, None, Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(timing.durations().len(), 2);
        assert_eq!(timing.read_cache_hit, None);
    }

    #[tokio::test]
    async fn test_realtime_review_like_invalidates_review_stats() {
        let (store, cache) = backends().await;
        let review = Review::new(Uuid::new_v4(), Uuid::new_v4(), "Nice movie!");
        store.create_review(&review).await.unwrap();
        cache
            .warm_up_review_stats(review.id, &ReviewStats::default())
            .await
            .unwrap();
        let user_id = Uuid::new_v4();

        let timing = realtime_review_like(&store, Some(&cache), user_id, review.id)
            .await
            .unwrap();

        assert_eq!(timing.read_cache_hit, Some(false));
        assert!(timing.cache_update_secs.is_some());
        let stats = store.get_review_stats(review.id).await.unwrap();
        assert_eq!(stats.total_ratings, 1);
    }

    #[tokio::test]
    async fn test_case_surfaces_store_error() {
        let store = InMemoryRepository::new();

        let result = user_likes_list(&store, None, Uuid::new_v4()).await;

        assert!(matches!(result, Err(BenchmarkError::Store(_))));
    }

    #[tokio::test]
    async fn test_case_surfaces_cache_error() {
        let (store, _) = backends().await;
        let closed = ProjectionCache::new(MemoryCache::new());

        let result = user_bookmarks_list(&store, Some(&closed), Uuid::new_v4()).await;

        assert!(matches!(result, Err(BenchmarkError::Cache(_))));
    }
}
