//! In-memory repository implementation.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use tokio::sync::RwLock;
use uuid::Uuid;

use ugcbench_core::domain::{
    validate_rating, Bookmark, Like, Movie, MovieStats, Review, ReviewLike, ReviewStats, User,
};
use ugcbench_core::storage::{
    BookmarkRepository, LikeRepository, MovieRepository, RepositoryError, Result,
    ReviewRepository, StoreConnection, UserRepository,
};

/// Rows keyed by ID, remembering insertion order for stable paging.
#[derive(Debug)]
struct Keyed<T> {
    rows: HashMap<Uuid, T>,
    order: Vec<Uuid>,
}

impl<T> Default for Keyed<T> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<T> Keyed<T> {
    /// Inserts a row unless its ID is taken. Returns true if inserted.
    fn insert(&mut self, id: Uuid, row: T) -> bool {
        if self.rows.contains_key(&id) {
            return false;
        }
        self.rows.insert(id, row);
        self.order.push(id);
        true
    }

    fn random_id(&self) -> Option<Uuid> {
        self.order.choose(&mut rand::rng()).copied()
    }

    fn sample_ids(&self, limit: usize) -> Vec<Uuid> {
        self.order
            .choose_multiple(&mut rand::rng(), limit)
            .copied()
            .collect()
    }

    fn page_ids(&self, offset: usize, limit: usize) -> Vec<Uuid> {
        self.order.iter().skip(offset).take(limit).copied().collect()
    }

    fn len(&self) -> u64 {
        self.order.len() as u64
    }
}

/// Rows keyed by a `(owner, target)` pair, indexed from both sides.
///
/// `owner` is always the user; `target` is a movie or a review.
#[derive(Debug)]
struct Pairs<T> {
    by_owner: HashMap<Uuid, HashMap<Uuid, T>>,
    by_target: HashMap<Uuid, HashSet<Uuid>>,
}

impl<T> Default for Pairs<T> {
    fn default() -> Self {
        Self {
            by_owner: HashMap::new(),
            by_target: HashMap::new(),
        }
    }
}

impl<T: Clone> Pairs<T> {
    fn contains(&self, owner: Uuid, target: Uuid) -> bool {
        self.by_owner
            .get(&owner)
            .is_some_and(|rows| rows.contains_key(&target))
    }

    /// Stores a row, replacing any previous one for the pair.
    fn upsert(&mut self, owner: Uuid, target: Uuid, row: T) {
        self.by_owner.entry(owner).or_default().insert(target, row);
        self.by_target.entry(target).or_default().insert(owner);
    }

    /// Stores a row only if the pair is free. Returns true if inserted.
    fn insert(&mut self, owner: Uuid, target: Uuid, row: T) -> bool {
        if self.contains(owner, target) {
            return false;
        }
        self.upsert(owner, target, row);
        true
    }

    fn remove(&mut self, owner: Uuid, target: Uuid) -> bool {
        let removed = self
            .by_owner
            .get_mut(&owner)
            .and_then(|rows| rows.remove(&target))
            .is_some();
        if removed {
            if let Some(owners) = self.by_target.get_mut(&target) {
                owners.remove(&owner);
            }
        }
        removed
    }

    fn of_owner(&self, owner: Uuid) -> Vec<T> {
        self.by_owner
            .get(&owner)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }

    fn of_target(&self, target: Uuid) -> impl Iterator<Item = &T> + '_ {
        self.by_target
            .get(&target)
            .into_iter()
            .flatten()
            .filter_map(move |owner| self.by_owner.get(owner)?.get(&target))
    }
}

/// In-memory storage backend.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access. Data
/// survives `close`/`connect` cycles but is lost when the repository is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    connected: Arc<AtomicBool>,
    users: Arc<RwLock<Keyed<User>>>,
    movies: Arc<RwLock<Keyed<Movie>>>,
    reviews: Arc<RwLock<Keyed<Review>>>,
    likes: Arc<RwLock<Pairs<Like>>>,
    bookmarks: Arc<RwLock<Pairs<Bookmark>>>,
    review_likes: Arc<RwLock<Pairs<ReviewLike>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty, disconnected in-memory repository.
    pub fn new() -> Self {
        Self {
            connected: Arc::new(AtomicBool::new(false)),
            users: Arc::default(),
            movies: Arc::default(),
            reviews: Arc::default(),
            likes: Arc::default(),
            bookmarks: Arc::default(),
            review_likes: Arc::default(),
        }
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(RepositoryError::StoreUnavailable(
                "in-memory store is not connected".to_string(),
            ))
        }
    }
}

#[async_trait]
impl StoreConnection for InMemoryRepository {
    async fn connect(&self) -> Result<()> {
        self.connected.store(true, Ordering::Release);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.connected.store(false, Ordering::Release);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn create_user(&self, user: &User) -> Result<User> {
        self.ensure_connected()?;
        let mut users = self.users.write().await;
        if !users.insert(user.id, user.clone()) {
            return Err(RepositoryError::DuplicateKey {
                entity_type: "User",
                id: user.id.to_string(),
            });
        }
        Ok(user.clone())
    }

    async fn get_random_user_id(&self) -> Result<Option<Uuid>> {
        self.ensure_connected()?;
        Ok(self.users.read().await.random_id())
    }

    async fn sample_user_ids(&self, limit: usize) -> Result<Vec<Uuid>> {
        self.ensure_connected()?;
        Ok(self.users.read().await.sample_ids(limit))
    }

    async fn list_user_ids(&self, offset: usize, limit: usize) -> Result<Vec<Uuid>> {
        self.ensure_connected()?;
        Ok(self.users.read().await.page_ids(offset, limit))
    }

    async fn count_users(&self) -> Result<u64> {
        self.ensure_connected()?;
        Ok(self.users.read().await.len())
    }

    async fn bulk_insert_users(&self, users: &[User]) -> Result<usize> {
        self.ensure_connected()?;
        let mut table = self.users.write().await;
        Ok(users
            .iter()
            .filter(|user| table.insert(user.id, (*user).clone()))
            .count())
    }
}

#[async_trait]
impl MovieRepository for InMemoryRepository {
    async fn create_movie(&self, movie: &Movie) -> Result<Movie> {
        self.ensure_connected()?;
        let mut movies = self.movies.write().await;
        if !movies.insert(movie.id, movie.clone()) {
            return Err(RepositoryError::DuplicateKey {
                entity_type: "Movie",
                id: movie.id.to_string(),
            });
        }
        Ok(movie.clone())
    }

    async fn get_random_movie_id(&self) -> Result<Option<Uuid>> {
        self.ensure_connected()?;
        Ok(self.movies.read().await.random_id())
    }

    async fn sample_movie_ids(&self, limit: usize) -> Result<Vec<Uuid>> {
        self.ensure_connected()?;
        Ok(self.movies.read().await.sample_ids(limit))
    }

    async fn list_movie_ids(&self, offset: usize, limit: usize) -> Result<Vec<Uuid>> {
        self.ensure_connected()?;
        Ok(self.movies.read().await.page_ids(offset, limit))
    }

    async fn count_movies(&self) -> Result<u64> {
        self.ensure_connected()?;
        Ok(self.movies.read().await.len())
    }

    async fn bulk_insert_movies(&self, movies: &[Movie]) -> Result<usize> {
        self.ensure_connected()?;
        let mut table = self.movies.write().await;
        Ok(movies
            .iter()
            .filter(|movie| table.insert(movie.id, (*movie).clone()))
            .count())
    }
}

#[async_trait]
impl LikeRepository for InMemoryRepository {
    async fn add_or_update_like(&self, like: &Like) -> Result<Like> {
        self.ensure_connected()?;
        validate_rating(like.rating)?;
        let mut likes = self.likes.write().await;
        likes.upsert(like.user_id, like.movie_id, like.clone());
        Ok(like.clone())
    }

    async fn remove_like(&self, user_id: Uuid, movie_id: Uuid) -> Result<bool> {
        self.ensure_connected()?;
        Ok(self.likes.write().await.remove(user_id, movie_id))
    }

    async fn get_user_likes(&self, user_id: Uuid) -> Result<Vec<Like>> {
        self.ensure_connected()?;
        Ok(self.likes.read().await.of_owner(user_id))
    }

    async fn get_movie_stats(&self, movie_id: Uuid) -> Result<MovieStats> {
        self.ensure_connected()?;
        let likes = self.likes.read().await;
        Ok(MovieStats::from_ratings(
            likes.of_target(movie_id).map(|like| like.rating),
        ))
    }

    async fn bulk_insert_likes(&self, likes: &[Like]) -> Result<usize> {
        self.ensure_connected()?;
        for like in likes {
            validate_rating(like.rating)?;
        }
        let mut table = self.likes.write().await;
        Ok(likes
            .iter()
            .filter(|like| table.insert(like.user_id, like.movie_id, (*like).clone()))
            .count())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryRepository {
    async fn create_review(&self, review: &Review) -> Result<Review> {
        self.ensure_connected()?;
        let mut reviews = self.reviews.write().await;
        if !reviews.insert(review.id, review.clone()) {
            return Err(RepositoryError::DuplicateKey {
                entity_type: "Review",
                id: review.id.to_string(),
            });
        }
        Ok(review.clone())
    }

    async fn get_random_review_id(&self) -> Result<Option<Uuid>> {
        self.ensure_connected()?;
        Ok(self.reviews.read().await.random_id())
    }

    async fn sample_review_ids(&self, limit: usize) -> Result<Vec<Uuid>> {
        self.ensure_connected()?;
        Ok(self.reviews.read().await.sample_ids(limit))
    }

    async fn add_or_update_review_like(&self, review_like: &ReviewLike) -> Result<ReviewLike> {
        self.ensure_connected()?;
        validate_rating(review_like.rating)?;
        let mut review_likes = self.review_likes.write().await;
        review_likes.upsert(
            review_like.user_id,
            review_like.review_id,
            review_like.clone(),
        );
        Ok(review_like.clone())
    }

    async fn remove_review_like(&self, user_id: Uuid, review_id: Uuid) -> Result<bool> {
        self.ensure_connected()?;
        Ok(self.review_likes.write().await.remove(user_id, review_id))
    }

    async fn get_review_stats(&self, review_id: Uuid) -> Result<ReviewStats> {
        self.ensure_connected()?;
        let review_likes = self.review_likes.read().await;
        Ok(ReviewStats::from_ratings(
            review_likes.of_target(review_id).map(|rl| rl.rating),
        ))
    }

    async fn bulk_insert_reviews(&self, reviews: &[Review]) -> Result<usize> {
        self.ensure_connected()?;
        let mut table = self.reviews.write().await;
        Ok(reviews
            .iter()
            .filter(|review| table.insert(review.id, (*review).clone()))
            .count())
    }

    async fn bulk_insert_review_likes(&self, review_likes: &[ReviewLike]) -> Result<usize> {
        self.ensure_connected()?;
        for review_like in review_likes {
            validate_rating(review_like.rating)?;
        }
        let mut table = self.review_likes.write().await;
        Ok(review_likes
            .iter()
            .filter(|rl| table.insert(rl.user_id, rl.review_id, (*rl).clone()))
            .count())
    }
}

#[async_trait]
impl BookmarkRepository for InMemoryRepository {
    async fn add_bookmark(&self, bookmark: &Bookmark) -> Result<bool> {
        self.ensure_connected()?;
        let mut bookmarks = self.bookmarks.write().await;
        Ok(bookmarks.insert(bookmark.user_id, bookmark.movie_id, bookmark.clone()))
    }

    async fn remove_bookmark(&self, user_id: Uuid, movie_id: Uuid) -> Result<bool> {
        self.ensure_connected()?;
        Ok(self.bookmarks.write().await.remove(user_id, movie_id))
    }

    async fn get_user_bookmarks(&self, user_id: Uuid) -> Result<Vec<Bookmark>> {
        self.ensure_connected()?;
        Ok(self.bookmarks.read().await.of_owner(user_id))
    }

    async fn bulk_insert_bookmarks(&self, bookmarks: &[Bookmark]) -> Result<usize> {
        self.ensure_connected()?;
        let mut table = self.bookmarks.write().await;
        Ok(bookmarks
            .iter()
            .filter(|b| table.insert(b.user_id, b.movie_id, (*b).clone()))
            .count())
    }
}
