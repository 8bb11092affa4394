use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{CachedUserBookmarks, CachedUserLikes, MovieStats, ReviewStats};

use super::Result;

/// Trait for a key-value cache engine.
///
/// Entries never expire; they disappear only through `delete` (or when an
/// in-process engine is closed).
#[async_trait]
pub trait Cache: Send + Sync {
    /// Opens the connection to the engine.
    async fn connect(&self) -> Result<()>;

    /// Closes the connection to the engine.
    async fn close(&self) -> Result<()>;

    /// Gets a value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache, overwriting any previous value.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Deletes a value from the cache by key. Deleting a missing key is a no-op.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Typed cache of projections derived from the persistent store.
///
/// Reads return `None` on a miss. An empty projection is a hit meaning the
/// entity is known to have no entries.
#[async_trait]
pub trait CacheRepository: Send + Sync {
    /// Opens the connection to the backing engine.
    async fn connect(&self) -> Result<()>;

    /// Closes the connection to the backing engine.
    async fn close(&self) -> Result<()>;

    /// Overwrites a user's likes projection.
    async fn warm_up_user_likes(&self, user_id: Uuid, likes: &HashMap<Uuid, u8>) -> Result<()>;

    /// Overwrites a user's bookmarks projection.
    async fn warm_up_user_bookmarks(&self, user_id: Uuid, bookmarks: &HashSet<Uuid>)
        -> Result<()>;

    /// Overwrites a movie's cached statistics.
    async fn warm_up_movie_stats(&self, movie_id: Uuid, stats: &MovieStats) -> Result<()>;

    /// Overwrites a review's cached statistics.
    async fn warm_up_review_stats(&self, review_id: Uuid, stats: &ReviewStats) -> Result<()>;

    /// Gets a user's likes projection.
    async fn get_user_likes(&self, user_id: Uuid) -> Result<Option<CachedUserLikes>>;

    /// Gets a user's bookmarks projection.
    async fn get_user_bookmarks(&self, user_id: Uuid) -> Result<Option<CachedUserBookmarks>>;

    /// Gets a movie's cached statistics.
    async fn get_movie_stats(&self, movie_id: Uuid) -> Result<Option<MovieStats>>;

    /// Gets a review's cached statistics.
    async fn get_review_stats(&self, review_id: Uuid) -> Result<Option<ReviewStats>>;

    /// Sets one rating inside a user's likes projection.
    ///
    /// Does not touch the movie's cached statistics; callers invalidate
    /// those separately.
    async fn update_user_like(&self, user_id: Uuid, movie_id: Uuid, rating: u8) -> Result<()>;

    /// Removes a movie's cached statistics.
    async fn invalidate_movie_stats(&self, movie_id: Uuid) -> Result<()>;

    /// Removes a review's cached statistics.
    async fn invalidate_review_stats(&self, review_id: Uuid) -> Result<()>;

    /// Removes a user's likes projection.
    async fn invalidate_user_likes(&self, user_id: Uuid) -> Result<()>;

    /// Removes a user's bookmarks projection.
    async fn invalidate_user_bookmarks(&self, user_id: Uuid) -> Result<()>;
}
