//! Typed projection cache over a key-value engine.
//!
//! Stores JSON projections of store data under the keys from
//! `ugcbench_core::cache`. Writes follow the cache-aside protocol: a rating
//! write patches the user's projection in place, while aggregates are only
//! ever invalidated.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use uuid::Uuid;

use ugcbench_core::cache::{
    deserialize_bookmarks, deserialize_likes, deserialize_movie_stats, deserialize_review_stats,
    movie_stats_key, review_stats_key, serialize_bookmarks, serialize_likes,
    serialize_movie_stats, serialize_review_stats, user_bookmarks_key, user_likes_key, Cache,
    CacheRepository, Result,
};
use ugcbench_core::domain::{CachedUserBookmarks, CachedUserLikes, MovieStats, ReviewStats};

/// [`CacheRepository`] implementation generic over the cache engine.
///
/// # Type Parameters
///
/// * `C` - The key-value engine holding the serialized projections
#[derive(Debug, Clone)]
pub struct ProjectionCache<C: Cache> {
    engine: C,
}

impl<C: Cache> ProjectionCache<C> {
    /// Creates a projection cache on top of `engine`.
    pub fn new(engine: C) -> Self {
        Self { engine }
    }

    /// The underlying key-value engine.
    pub fn engine(&self) -> &C {
        &self.engine
    }
}

#[async_trait]
impl<C> CacheRepository for ProjectionCache<C>
where
    C: Cache + 'static,
{
    async fn connect(&self) -> Result<()> {
        self.engine.connect().await
    }

    async fn close(&self) -> Result<()> {
        self.engine.close().await
    }

    async fn warm_up_user_likes(&self, user_id: Uuid, likes: &HashMap<Uuid, u8>) -> Result<()> {
        let bytes = serialize_likes(likes)?;
        self.engine.set(&user_likes_key(user_id), &bytes).await
    }

    async fn warm_up_user_bookmarks(
        &self,
        user_id: Uuid,
        bookmarks: &HashSet<Uuid>,
    ) -> Result<()> {
        let bytes = serialize_bookmarks(bookmarks)?;
        self.engine.set(&user_bookmarks_key(user_id), &bytes).await
    }

    async fn warm_up_movie_stats(&self, movie_id: Uuid, stats: &MovieStats) -> Result<()> {
        let bytes = serialize_movie_stats(stats)?;
        self.engine.set(&movie_stats_key(movie_id), &bytes).await
    }

    async fn warm_up_review_stats(&self, review_id: Uuid, stats: &ReviewStats) -> Result<()> {
        let bytes = serialize_review_stats(stats)?;
        self.engine.set(&review_stats_key(review_id), &bytes).await
    }

    async fn get_user_likes(&self, user_id: Uuid) -> Result<Option<CachedUserLikes>> {
        let Some(bytes) = self.engine.get(&user_likes_key(user_id)).await? else {
            return Ok(None);
        };
        Ok(Some(CachedUserLikes {
            user_id,
            likes: deserialize_likes(&bytes)?,
        }))
    }

    async fn get_user_bookmarks(&self, user_id: Uuid) -> Result<Option<CachedUserBookmarks>> {
        let Some(bytes) = self.engine.get(&user_bookmarks_key(user_id)).await? else {
            return Ok(None);
        };
        Ok(Some(CachedUserBookmarks {
            user_id,
            bookmarks: deserialize_bookmarks(&bytes)?,
        }))
    }

    async fn get_movie_stats(&self, movie_id: Uuid) -> Result<Option<MovieStats>> {
        match self.engine.get(&movie_stats_key(movie_id)).await? {
            Some(bytes) => Ok(Some(deserialize_movie_stats(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn get_review_stats(&self, review_id: Uuid) -> Result<Option<ReviewStats>> {
        match self.engine.get(&review_stats_key(review_id)).await? {
            Some(bytes) => Ok(Some(deserialize_review_stats(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn update_user_like(&self, user_id: Uuid, movie_id: Uuid, rating: u8) -> Result<()> {
        let key = user_likes_key(user_id);

        // A projection built from one rating would look complete to readers.
        let Some(bytes) = self.engine.get(&key).await? else {
            tracing::trace!(user_id = %user_id, "No likes projection to update");
            return Ok(());
        };

        let mut likes = deserialize_likes(&bytes)?;
        likes.insert(movie_id, rating);
        self.engine.set(&key, &serialize_likes(&likes)?).await
    }

    async fn invalidate_movie_stats(&self, movie_id: Uuid) -> Result<()> {
        self.engine.delete(&movie_stats_key(movie_id)).await
    }

    async fn invalidate_review_stats(&self, review_id: Uuid) -> Result<()> {
        self.engine.delete(&review_stats_key(review_id)).await
    }

    async fn invalidate_user_likes(&self, user_id: Uuid) -> Result<()> {
        self.engine.delete(&user_likes_key(user_id)).await
    }

    async fn invalidate_user_bookmarks(&self, user_id: Uuid) -> Result<()> {
        self.engine.delete(&user_bookmarks_key(user_id)).await
    }
}
