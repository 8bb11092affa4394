use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Bookmark, Like, Movie, MovieStats, Review, ReviewLike, ReviewStats, User};

use super::Result;

/// Connection lifecycle of a persistent store.
///
/// Every other operation fails with `StoreUnavailable` until `connect`
/// succeeds, and again after `close`.
#[async_trait]
pub trait StoreConnection: Send + Sync {
    /// Opens the connection. Calling it on an open store is a no-op.
    async fn connect(&self) -> Result<()>;

    /// Closes the connection. Calling it on a closed store is a no-op.
    async fn close(&self) -> Result<()>;
}

/// Repository for user operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a new user, failing with `DuplicateKey` if the ID is taken.
    async fn create_user(&self, user: &User) -> Result<User>;

    /// Picks a user ID uniformly at random, or `None` if there are no users.
    async fn get_random_user_id(&self) -> Result<Option<Uuid>>;

    /// Picks up to `limit` distinct user IDs uniformly at random.
    async fn sample_user_ids(&self, limit: usize) -> Result<Vec<Uuid>>;

    /// Pages through user IDs in a stable order.
    async fn list_user_ids(&self, offset: usize, limit: usize) -> Result<Vec<Uuid>>;

    /// Counts stored users.
    async fn count_users(&self) -> Result<u64>;

    /// Inserts users, skipping any whose ID already exists.
    ///
    /// Returns the number of rows actually inserted.
    async fn bulk_insert_users(&self, users: &[User]) -> Result<usize>;
}

/// Repository for movie operations.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Creates a new movie, failing with `DuplicateKey` if the ID is taken.
    async fn create_movie(&self, movie: &Movie) -> Result<Movie>;

    /// Picks a movie ID uniformly at random, or `None` if there are no movies.
    async fn get_random_movie_id(&self) -> Result<Option<Uuid>>;

    /// Picks up to `limit` distinct movie IDs uniformly at random.
    async fn sample_movie_ids(&self, limit: usize) -> Result<Vec<Uuid>>;

    /// Pages through movie IDs in a stable order.
    async fn list_movie_ids(&self, offset: usize, limit: usize) -> Result<Vec<Uuid>>;

    /// Counts stored movies.
    async fn count_movies(&self) -> Result<u64>;

    /// Inserts movies, skipping any whose ID already exists.
    async fn bulk_insert_movies(&self, movies: &[Movie]) -> Result<usize>;
}

/// Repository for movie ratings.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Inserts or replaces the rating for `(user_id, movie_id)`.
    ///
    /// Returns the row as stored.
    async fn add_or_update_like(&self, like: &Like) -> Result<Like>;

    /// Deletes a rating. Returns true if a row was removed.
    async fn remove_like(&self, user_id: Uuid, movie_id: Uuid) -> Result<bool>;

    /// Gets all ratings given by a user.
    async fn get_user_likes(&self, user_id: Uuid) -> Result<Vec<Like>>;

    /// Aggregates every rating of a movie.
    async fn get_movie_stats(&self, movie_id: Uuid) -> Result<MovieStats>;

    /// Inserts ratings, skipping any `(user_id, movie_id)` pair already rated.
    async fn bulk_insert_likes(&self, likes: &[Like]) -> Result<usize>;
}

/// Repository for reviews and their ratings.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Creates a new review, failing with `DuplicateKey` if the ID is taken.
    async fn create_review(&self, review: &Review) -> Result<Review>;

    /// Picks a review ID uniformly at random, or `None` if there are no reviews.
    async fn get_random_review_id(&self) -> Result<Option<Uuid>>;

    /// Picks up to `limit` distinct review IDs uniformly at random.
    async fn sample_review_ids(&self, limit: usize) -> Result<Vec<Uuid>>;

    /// Inserts or replaces the rating for `(user_id, review_id)`.
    async fn add_or_update_review_like(&self, review_like: &ReviewLike) -> Result<ReviewLike>;

    /// Deletes a review rating. Returns true if a row was removed.
    async fn remove_review_like(&self, user_id: Uuid, review_id: Uuid) -> Result<bool>;

    /// Aggregates every rating of a review.
    async fn get_review_stats(&self, review_id: Uuid) -> Result<ReviewStats>;

    /// Inserts reviews, skipping any whose ID already exists.
    async fn bulk_insert_reviews(&self, reviews: &[Review]) -> Result<usize>;

    /// Inserts review ratings, skipping any `(user_id, review_id)` pair already rated.
    async fn bulk_insert_review_likes(&self, review_likes: &[ReviewLike]) -> Result<usize>;
}

/// Repository for bookmarks.
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// Adds a bookmark. Returns false if it already existed.
    async fn add_bookmark(&self, bookmark: &Bookmark) -> Result<bool>;

    /// Deletes a bookmark. Returns true if a row was removed.
    async fn remove_bookmark(&self, user_id: Uuid, movie_id: Uuid) -> Result<bool>;

    /// Gets all bookmarks of a user.
    async fn get_user_bookmarks(&self, user_id: Uuid) -> Result<Vec<Bookmark>>;

    /// Inserts bookmarks, skipping any that already exist.
    async fn bulk_insert_bookmarks(&self, bookmarks: &[Bookmark]) -> Result<usize>;
}

/// Combined trait for a complete persistent store.
pub trait StoreRepository:
    StoreConnection
    + UserRepository
    + MovieRepository
    + LikeRepository
    + ReviewRepository
    + BookmarkRepository
{
}

impl<T> StoreRepository for T where
    T: StoreConnection
        + UserRepository
        + MovieRepository
        + LikeRepository
        + ReviewRepository
        + BookmarkRepository
{
}
