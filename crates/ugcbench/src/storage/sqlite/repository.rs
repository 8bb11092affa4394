//! SQLite repository implementation.
//!
//! Implements the repository traits from `ugcbench_core::storage` using SQLite.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use ugcbench_core::domain::{
    validate_rating, Bookmark, Like, Movie, MovieStats, Review, ReviewLike, ReviewStats, User,
};
use ugcbench_core::storage::{
    BookmarkRepository, LikeRepository, MovieRepository, RepositoryError, Result,
    ReviewRepository, StoreConnection, UserRepository,
};

use super::conversions::{
    format_datetime, row_to_bookmark, row_to_id, row_to_like, row_to_movie_stats,
    row_to_review_like, row_to_review_stats,
};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Where the database lives.
#[derive(Debug, Clone)]
enum Location {
    File(String),
    Memory,
}

/// SQLite-based repository implementation.
///
/// The database is opened by `connect` and the schema is created on every
/// open. An in-memory database starts empty on each `connect`.
pub struct SqliteRepository {
    location: Location,
    conn: RwLock<Option<Connection>>,
}

impl SqliteRepository {
    /// Creates a disconnected repository backed by a database file.
    ///
    /// The file will be created on `connect` if it doesn't exist.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            location: Location::File(path.into()),
            conn: RwLock::new(None),
        }
    }

    /// Creates a disconnected repository backed by an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is closed.
    pub fn new_in_memory() -> Self {
        Self {
            location: Location::Memory,
            conn: RwLock::new(None),
        }
    }

    /// Returns a handle to the open connection.
    async fn conn(&self) -> Result<Connection> {
        self.conn.read().await.clone().ok_or_else(|| {
            RepositoryError::StoreUnavailable("SQLite store is not connected".to_string())
        })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    /// Runs one `INSERT OR IGNORE` statement per row inside a single transaction.
    ///
    /// Returns the number of rows actually inserted.
    async fn bulk_insert<P>(
        &self,
        sql: &'static str,
        rows: Vec<P>,
        entity_type: &'static str,
    ) -> Result<usize>
    where
        P: rusqlite::Params + Send + 'static,
    {
        let conn = self.conn().await?;
        if rows.is_empty() {
            return Ok(0);
        }

        conn.call(move |conn| {
            let tx = conn.transaction().map_err(wrap_err)?;
            let mut inserted = 0;
            {
                let mut stmt = tx.prepare_cached(sql).map_err(wrap_err)?;
                for row in rows {
                    inserted += stmt.execute(row).map_err(wrap_err)?;
                }
            }
            tx.commit().map_err(wrap_err)?;
            Ok(inserted)
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error(e, entity_type))
    }

    async fn random_ids(
        &self,
        sql: &'static str,
        limit: usize,
        entity_type: &'static str,
    ) -> Result<Vec<Uuid>> {
        let conn = self.conn().await?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        conn.call(move |conn| {
            let mut stmt = conn.prepare_cached(sql).map_err(wrap_err)?;
            let rows = stmt.query_map([limit], row_to_id).map_err(wrap_err)?;

            let mut ids = Vec::new();
            for row_result in rows {
                ids.push(row_result.map_err(wrap_err)?);
            }
            Ok(ids)
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error(e, entity_type))
    }

    async fn page_ids(
        &self,
        sql: &'static str,
        offset: usize,
        limit: usize,
        entity_type: &'static str,
    ) -> Result<Vec<Uuid>> {
        let conn = self.conn().await?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);

        conn.call(move |conn| {
            let mut stmt = conn.prepare_cached(sql).map_err(wrap_err)?;
            let rows = stmt
                .query_map([limit, offset], row_to_id)
                .map_err(wrap_err)?;

            let mut ids = Vec::new();
            for row_result in rows {
                ids.push(row_result.map_err(wrap_err)?);
            }
            Ok(ids)
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error(e, entity_type))
    }

    async fn count(&self, sql: &'static str, entity_type: &'static str) -> Result<u64> {
        let conn = self.conn().await?;

        let count: i64 = conn
            .call(move |conn| {
                conn.query_row(sql, [], |row| row.get(0))
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type))?;

        Ok(count.max(0) as u64)
    }

    /// Executes a statement and reports whether it changed a row.
    async fn execute_changed(
        &self,
        sql: &'static str,
        params: [String; 2],
        entity_type: &'static str,
    ) -> Result<bool> {
        let conn = self.conn().await?;

        conn.call(move |conn| {
            let changed = conn.execute(sql, params).map_err(wrap_err)?;
            Ok(changed > 0)
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error(e, entity_type))
    }
}

// ============================================================================
// StoreConnection implementation
// ============================================================================

#[async_trait]
impl StoreConnection for SqliteRepository {
    async fn connect(&self) -> Result<()> {
        let mut slot = self.conn.write().await;
        if slot.is_some() {
            return Ok(());
        }

        let conn = match &self.location {
            Location::File(path) => Connection::open(path.clone()).await,
            Location::Memory => Connection::open_in_memory().await,
        }
        .map_err(|e| RepositoryError::StoreUnavailable(e.to_string()))?;

        Self::init_schema(&conn).await?;

        tracing::debug!(location = ?self.location, "SQLite store connected");
        *slot = Some(conn);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let Some(conn) = self.conn.write().await.take() else {
            return Ok(());
        };

        conn.close()
            .await
            .map_err(|e| RepositoryError::StoreUnavailable(e.to_string()))
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn create_user(&self, user: &User) -> Result<User> {
        let conn = self.conn().await?;
        let id = user.id.to_string();
        let name = user.name.clone();
        let user_id = id.clone();

        conn.call(move |conn| {
            conn.execute(schema::INSERT_USER, rusqlite::params![id, name])
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", user_id))?;

        Ok(user.clone())
    }

    async fn get_random_user_id(&self) -> Result<Option<Uuid>> {
        let ids = self
            .random_ids(schema::SELECT_RANDOM_USER_IDS, 1, "User")
            .await?;
        Ok(ids.into_iter().next())
    }

    async fn sample_user_ids(&self, limit: usize) -> Result<Vec<Uuid>> {
        self.random_ids(schema::SELECT_RANDOM_USER_IDS, limit, "User")
            .await
    }

    async fn list_user_ids(&self, offset: usize, limit: usize) -> Result<Vec<Uuid>> {
        self.page_ids(schema::SELECT_USER_IDS_PAGE, offset, limit, "User")
            .await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count(schema::COUNT_USERS, "User").await
    }

    async fn bulk_insert_users(&self, users: &[User]) -> Result<usize> {
        let rows: Vec<(String, String)> = users
            .iter()
            .map(|u| (u.id.to_string(), u.name.clone()))
            .collect();

        self.bulk_insert(schema::INSERT_OR_IGNORE_USER, rows, "User")
            .await
    }
}

// ============================================================================
// MovieRepository implementation
// ============================================================================

#[async_trait]
impl MovieRepository for SqliteRepository {
    async fn create_movie(&self, movie: &Movie) -> Result<Movie> {
        let conn = self.conn().await?;
        let id = movie.id.to_string();
        let title = movie.title.clone();
        let movie_id = id.clone();

        conn.call(move |conn| {
            conn.execute(schema::INSERT_MOVIE, rusqlite::params![id, title])
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Movie", movie_id))?;

        Ok(movie.clone())
    }

    async fn get_random_movie_id(&self) -> Result<Option<Uuid>> {
        let ids = self
            .random_ids(schema::SELECT_RANDOM_MOVIE_IDS, 1, "Movie")
            .await?;
        Ok(ids.into_iter().next())
    }

    async fn sample_movie_ids(&self, limit: usize) -> Result<Vec<Uuid>> {
        self.random_ids(schema::SELECT_RANDOM_MOVIE_IDS, limit, "Movie")
            .await
    }

    async fn list_movie_ids(&self, offset: usize, limit: usize) -> Result<Vec<Uuid>> {
        self.page_ids(schema::SELECT_MOVIE_IDS_PAGE, offset, limit, "Movie")
            .await
    }

    async fn count_movies(&self) -> Result<u64> {
        self.count(schema::COUNT_MOVIES, "Movie").await
    }

    async fn bulk_insert_movies(&self, movies: &[Movie]) -> Result<usize> {
        let rows: Vec<(String, String)> = movies
            .iter()
            .map(|m| (m.id.to_string(), m.title.clone()))
            .collect();

        self.bulk_insert(schema::INSERT_OR_IGNORE_MOVIE, rows, "Movie")
            .await
    }
}

// ============================================================================
// LikeRepository implementation
// ============================================================================

#[async_trait]
impl LikeRepository for SqliteRepository {
    async fn add_or_update_like(&self, like: &Like) -> Result<Like> {
        let rating = validate_rating(like.rating)?;
        let conn = self.conn().await?;
        let user_id = like.user_id.to_string();
        let movie_id = like.movie_id.to_string();
        let timestamp = format_datetime(&like.timestamp);

        conn.call(move |conn| {
            conn.query_row(
                schema::UPSERT_LIKE,
                rusqlite::params![user_id, movie_id, rating, timestamp],
                row_to_like,
            )
            .map_err(wrap_err)
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error(e, "Like"))
    }

    async fn remove_like(&self, user_id: Uuid, movie_id: Uuid) -> Result<bool> {
        self.execute_changed(
            schema::DELETE_LIKE,
            [user_id.to_string(), movie_id.to_string()],
            "Like",
        )
        .await
    }

    async fn get_user_likes(&self, user_id: Uuid) -> Result<Vec<Like>> {
        let conn = self.conn().await?;
        let user_id = user_id.to_string();

        conn.call(move |conn| {
            let mut stmt = conn
                .prepare_cached(schema::SELECT_LIKES_BY_USER)
                .map_err(wrap_err)?;
            let rows = stmt.query_map([&user_id], row_to_like).map_err(wrap_err)?;

            let mut likes = Vec::new();
            for row_result in rows {
                likes.push(row_result.map_err(wrap_err)?);
            }
            Ok(likes)
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error(e, "Like"))
    }

    async fn get_movie_stats(&self, movie_id: Uuid) -> Result<MovieStats> {
        let conn = self.conn().await?;
        let movie_id = movie_id.to_string();

        conn.call(move |conn| {
            conn.query_row(schema::SELECT_MOVIE_STATS, [&movie_id], row_to_movie_stats)
                .map_err(wrap_err)
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error(e, "MovieStats"))
    }

    async fn bulk_insert_likes(&self, likes: &[Like]) -> Result<usize> {
        let mut rows = Vec::with_capacity(likes.len());
        for like in likes {
            rows.push((
                like.user_id.to_string(),
                like.movie_id.to_string(),
                validate_rating(like.rating)?,
                format_datetime(&like.timestamp),
            ));
        }

        self.bulk_insert(schema::INSERT_OR_IGNORE_LIKE, rows, "Like")
            .await
    }
}

// ============================================================================
// ReviewRepository implementation
// ============================================================================

#[async_trait]
impl ReviewRepository for SqliteRepository {
    async fn create_review(&self, review: &Review) -> Result<Review> {
        let conn = self.conn().await?;
        let id = review.id.to_string();
        let movie_id = review.movie_id.to_string();
        let user_id = review.user_id.to_string();
        let text = review.text.clone();
        let created_at = format_datetime(&review.created_at);
        let review_id = id.clone();

        conn.call(move |conn| {
            conn.execute(
                schema::INSERT_REVIEW,
                rusqlite::params![id, movie_id, user_id, text, created_at],
            )
            .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Review", review_id))?;

        Ok(review.clone())
    }

    async fn get_random_review_id(&self) -> Result<Option<Uuid>> {
        let ids = self
            .random_ids(schema::SELECT_RANDOM_REVIEW_IDS, 1, "Review")
            .await?;
        Ok(ids.into_iter().next())
    }

    async fn sample_review_ids(&self, limit: usize) -> Result<Vec<Uuid>> {
        self.random_ids(schema::SELECT_RANDOM_REVIEW_IDS, limit, "Review")
            .await
    }

    async fn add_or_update_review_like(&self, review_like: &ReviewLike) -> Result<ReviewLike> {
        let rating = validate_rating(review_like.rating)?;
        let conn = self.conn().await?;
        let user_id = review_like.user_id.to_string();
        let review_id = review_like.review_id.to_string();
        let timestamp = format_datetime(&review_like.timestamp);

        conn.call(move |conn| {
            conn.query_row(
                schema::UPSERT_REVIEW_LIKE,
                rusqlite::params![user_id, review_id, rating, timestamp],
                row_to_review_like,
            )
            .map_err(wrap_err)
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error(e, "ReviewLike"))
    }

    async fn remove_review_like(&self, user_id: Uuid, review_id: Uuid) -> Result<bool> {
        self.execute_changed(
            schema::DELETE_REVIEW_LIKE,
            [user_id.to_string(), review_id.to_string()],
            "ReviewLike",
        )
        .await
    }

    async fn get_review_stats(&self, review_id: Uuid) -> Result<ReviewStats> {
        let conn = self.conn().await?;
        let review_id = review_id.to_string();

        conn.call(move |conn| {
            conn.query_row(
                schema::SELECT_REVIEW_STATS,
                [&review_id],
                row_to_review_stats,
            )
            .map_err(wrap_err)
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error(e, "ReviewStats"))
    }

    async fn bulk_insert_reviews(&self, reviews: &[Review]) -> Result<usize> {
        let rows: Vec<(String, String, String, String, String)> = reviews
            .iter()
            .map(|r| {
                (
                    r.id.to_string(),
                    r.movie_id.to_string(),
                    r.user_id.to_string(),
                    r.text.clone(),
                    format_datetime(&r.created_at),
                )
            })
            .collect();

        self.bulk_insert(schema::INSERT_OR_IGNORE_REVIEW, rows, "Review")
            .await
    }

    async fn bulk_insert_review_likes(&self, review_likes: &[ReviewLike]) -> Result<usize> {
        let mut rows = Vec::with_capacity(review_likes.len());
        for rl in review_likes {
            rows.push((
                rl.user_id.to_string(),
                rl.review_id.to_string(),
                validate_rating(rl.rating)?,
                format_datetime(&rl.timestamp),
            ));
        }

        self.bulk_insert(schema::INSERT_OR_IGNORE_REVIEW_LIKE, rows, "ReviewLike")
            .await
    }
}

// ============================================================================
// BookmarkRepository implementation
// ============================================================================

#[async_trait]
impl BookmarkRepository for SqliteRepository {
    async fn add_bookmark(&self, bookmark: &Bookmark) -> Result<bool> {
        let conn = self.conn().await?;
        let user_id = bookmark.user_id.to_string();
        let movie_id = bookmark.movie_id.to_string();
        let timestamp = format_datetime(&bookmark.timestamp);

        conn.call(move |conn| {
            let inserted = conn
                .execute(
                    schema::INSERT_OR_IGNORE_BOOKMARK,
                    rusqlite::params![user_id, movie_id, timestamp],
                )
                .map_err(wrap_err)?;
            Ok(inserted == 1)
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error(e, "Bookmark"))
    }

    async fn remove_bookmark(&self, user_id: Uuid, movie_id: Uuid) -> Result<bool> {
        self.execute_changed(
            schema::DELETE_BOOKMARK,
            [user_id.to_string(), movie_id.to_string()],
            "Bookmark",
        )
        .await
    }

    async fn get_user_bookmarks(&self, user_id: Uuid) -> Result<Vec<Bookmark>> {
        let conn = self.conn().await?;
        let user_id = user_id.to_string();

        conn.call(move |conn| {
            let mut stmt = conn
                .prepare_cached(schema::SELECT_BOOKMARKS_BY_USER)
                .map_err(wrap_err)?;
            let rows = stmt
                .query_map([&user_id], row_to_bookmark)
                .map_err(wrap_err)?;

            let mut bookmarks = Vec::new();
            for row_result in rows {
                bookmarks.push(row_result.map_err(wrap_err)?);
            }
            Ok(bookmarks)
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error(e, "Bookmark"))
    }

    async fn bulk_insert_bookmarks(&self, bookmarks: &[Bookmark]) -> Result<usize> {
        let rows: Vec<(String, String, String)> = bookmarks
            .iter()
            .map(|b| {
                (
                    b.user_id.to_string(),
                    b.movie_id.to_string(),
                    format_datetime(&b.timestamp),
                )
            })
            .collect();

        self.bulk_insert(schema::INSERT_OR_IGNORE_BOOKMARK, rows, "Bookmark")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn connected_repo() -> SqliteRepository {
        let repo = SqliteRepository::new_in_memory();
        repo.connect().await.unwrap();
        repo
    }

    fn users(count: usize) -> Vec<User> {
        (0..count).map(|j| User::new(format!("User{j}"))).collect()
    }

    // ==================== Connection Tests ====================

    #[tokio::test]
    async fn test_operations_fail_before_connect() {
        let repo = SqliteRepository::new_in_memory();

        let result = repo.count_movies().await;

        assert!(matches!(result, Err(RepositoryError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_close_then_operations_fail() {
        let repo = connected_repo().await;

        repo.close().await.unwrap();
        repo.close().await.unwrap();

        assert!(matches!(
            repo.get_random_user_id().await,
            Err(RepositoryError::StoreUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_twice_is_noop() {
        let repo = connected_repo().await;
        repo.bulk_insert_users(&users(2)).await.unwrap();

        repo.connect().await.unwrap();

        assert_eq!(repo.count_users().await.unwrap(), 2);
    }

    // ==================== User / Movie Tests ====================

    #[tokio::test]
    async fn test_create_user_duplicate_key() {
        let repo = connected_repo().await;
        let user = User::new("User0");

        let created = repo.create_user(&user).await.unwrap();
        let result = repo.create_user(&user).await;

        assert_eq!(created, user);
        match result {
            Err(RepositoryError::DuplicateKey { entity_type, id }) => {
                assert_eq!(entity_type, "User");
                assert_eq!(id, user.id.to_string());
            }
            other => panic!("Expected DuplicateKey error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_movie_duplicate_key() {
        let repo = connected_repo().await;
        let movie = Movie::new("Movie0");
        repo.create_movie(&movie).await.unwrap();

        let result = repo.create_movie(&movie).await;

        assert!(matches!(
            result,
            Err(RepositoryError::DuplicateKey {
                entity_type: "Movie",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_random_ids_on_empty_tables() {
        let repo = connected_repo().await;

        assert_eq!(repo.get_random_user_id().await.unwrap(), None);
        assert_eq!(repo.get_random_movie_id().await.unwrap(), None);
        assert_eq!(repo.get_random_review_id().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_bulk_insert_users_skips_duplicate() {
        let repo = connected_repo().await;
        let mut batch = users(5);
        batch.push(batch[2].clone());

        let inserted = repo.bulk_insert_users(&batch).await.unwrap();

        assert_eq!(inserted, 5);
        assert_eq!(repo.count_users().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_bulk_insert_empty_is_noop() {
        let repo = connected_repo().await;

        assert_eq!(repo.bulk_insert_movies(&[]).await.unwrap(), 0);
        assert_eq!(repo.bulk_insert_likes(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_user_ids_pages_in_insertion_order() {
        let repo = connected_repo().await;
        let batch = users(5);
        repo.bulk_insert_users(&batch).await.unwrap();

        let mut paged = repo.list_user_ids(0, 3).await.unwrap();
        paged.extend(repo.list_user_ids(3, 3).await.unwrap());

        let expected: Vec<Uuid> = batch.iter().map(|u| u.id).collect();
        assert_eq!(paged, expected);
        assert!(repo.list_user_ids(5, 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sample_movie_ids_are_distinct() {
        let repo = connected_repo().await;
        let movies: Vec<Movie> = (0..6).map(|j| Movie::new(format!("Movie{j}"))).collect();
        repo.bulk_insert_movies(&movies).await.unwrap();

        let sample = repo.sample_movie_ids(4).await.unwrap();
        let everything = repo.sample_movie_ids(100).await.unwrap();

        assert_eq!(sample.iter().collect::<HashSet<_>>().len(), 4);
        assert_eq!(everything.len(), 6);
    }

    // ==================== Like Tests ====================

    #[tokio::test]
    async fn test_add_or_update_like_keeps_one_row_with_latest_rating() {
        let repo = connected_repo().await;
        let user_id = Uuid::new_v4();
        let movie_id = Uuid::new_v4();

        repo.add_or_update_like(&Like::new(user_id, movie_id, 3))
            .await
            .unwrap();
        let stored = repo
            .add_or_update_like(&Like::new(user_id, movie_id, 8))
            .await
            .unwrap();

        assert_eq!(stored.rating, 8);
        let likes = repo.get_user_likes(user_id).await.unwrap();
        assert_eq!(likes.len(), 1);
        assert_eq!(likes[0].rating, 8);
    }

    #[tokio::test]
    async fn test_add_or_update_like_rejects_invalid_rating() {
        let repo = connected_repo().await;

        let result = repo
            .add_or_update_like(&Like::new(Uuid::new_v4(), Uuid::new_v4(), 200))
            .await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_movie_stats_for_unrated_movie() {
        let repo = connected_repo().await;

        let stats = repo.get_movie_stats(Uuid::new_v4()).await.unwrap();

        assert_eq!(stats.total_likes, 0);
        assert_eq!(stats.total_dislikes, 0);
        assert_eq!(stats.total_reviews, 0);
        assert_eq!(stats.avg_rating, None);
    }

    #[tokio::test]
    async fn test_movie_stats_match_pure_derivation() {
        let repo = connected_repo().await;
        let movie_id = Uuid::new_v4();
        let ratings = [0u8, 5, 6, 10, 7];
        let likes: Vec<Like> = ratings
            .iter()
            .map(|&r| Like::new(Uuid::new_v4(), movie_id, r))
            .collect();
        repo.bulk_insert_likes(&likes).await.unwrap();

        let stats = repo.get_movie_stats(movie_id).await.unwrap();

        assert_eq!(stats, MovieStats::from_ratings(ratings));
    }

    #[tokio::test]
    async fn test_bulk_insert_likes_with_duplicate_pair() {
        let repo = connected_repo().await;
        let user_id = Uuid::new_v4();
        let movie_ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let mut batch: Vec<Like> = movie_ids
            .iter()
            .map(|&m| Like::new(user_id, m, 5))
            .collect();
        batch.push(Like::new(user_id, movie_ids[0], 9));

        let inserted = repo.bulk_insert_likes(&batch).await.unwrap();

        assert_eq!(inserted, 4);
        assert_eq!(repo.get_user_likes(user_id).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_remove_like() {
        let repo = connected_repo().await;
        let like = Like::new(Uuid::new_v4(), Uuid::new_v4(), 4);
        repo.add_or_update_like(&like).await.unwrap();

        assert!(repo.remove_like(like.user_id, like.movie_id).await.unwrap());
        assert!(!repo.remove_like(like.user_id, like.movie_id).await.unwrap());
    }

    // ==================== Review Tests ====================

    #[tokio::test]
    async fn test_review_like_upsert_and_stats() {
        let repo = connected_repo().await;
        let review = Review::new(Uuid::new_v4(), Uuid::new_v4(), "Nice movie!");
        repo.create_review(&review).await.unwrap();
        let rater = Uuid::new_v4();

        repo.add_or_update_review_like(&ReviewLike::new(rater, review.id, 2))
            .await
            .unwrap();
        repo.add_or_update_review_like(&ReviewLike::new(rater, review.id, 9))
            .await
            .unwrap();
        repo.add_or_update_review_like(&ReviewLike::new(Uuid::new_v4(), review.id, 3))
            .await
            .unwrap();

        let stats = repo.get_review_stats(review.id).await.unwrap();
        assert_eq!(stats.total_ratings, 2);
        assert_eq!(stats.total_likes, 1);
        assert_eq!(stats.total_dislikes, 1);
        assert_eq!(stats.avg_rating, Some(6.0));

        assert!(repo.remove_review_like(rater, review.id).await.unwrap());
        assert_eq!(repo.get_review_stats(review.id).await.unwrap().total_ratings, 1);
    }

    #[tokio::test]
    async fn test_bulk_insert_reviews_and_random_pick() {
        let repo = connected_repo().await;
        let reviews: Vec<Review> = (0..3)
            .map(|_| Review::new(Uuid::new_v4(), Uuid::new_v4(), "Nice movie!"))
            .collect();

        let inserted = repo.bulk_insert_reviews(&reviews).await.unwrap();

        assert_eq!(inserted, 3);
        let picked = repo.get_random_review_id().await.unwrap().unwrap();
        assert!(reviews.iter().any(|r| r.id == picked));
    }

    #[tokio::test]
    async fn test_bulk_insert_review_likes_skips_duplicate() {
        let repo = connected_repo().await;
        let rl = ReviewLike::new(Uuid::new_v4(), Uuid::new_v4(), 6);

        let inserted = repo
            .bulk_insert_review_likes(&[rl.clone(), rl.clone()])
            .await
            .unwrap();

        assert_eq!(inserted, 1);
    }

    // ==================== Bookmark Tests ====================

    #[tokio::test]
    async fn test_add_bookmark_twice() {
        let repo = connected_repo().await;
        let bookmark = Bookmark::new(Uuid::new_v4(), Uuid::new_v4());

        assert!(repo.add_bookmark(&bookmark).await.unwrap());
        assert!(!repo.add_bookmark(&bookmark).await.unwrap());

        let stored = repo.get_user_bookmarks(bookmark.user_id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].movie_id, bookmark.movie_id);
    }

    #[tokio::test]
    async fn test_bulk_insert_bookmarks_and_remove() {
        let repo = connected_repo().await;
        let user_id = Uuid::new_v4();
        let bookmarks: Vec<Bookmark> = (0..3)
            .map(|_| Bookmark::new(user_id, Uuid::new_v4()))
            .collect();

        assert_eq!(repo.bulk_insert_bookmarks(&bookmarks).await.unwrap(), 3);
        assert!(repo
            .remove_bookmark(user_id, bookmarks[0].movie_id)
            .await
            .unwrap());
        assert_eq!(repo.get_user_bookmarks(user_id).await.unwrap().len(), 2);
    }
}
