//! Synthetic dataset generation.
//!
//! Pure functions that build users, movies and per-user activity. They have no
//! side effects; the `ugcbench` data generator feeds their output to a store.

use std::ops::Range;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Bookmark, Like, Movie, Review, ReviewLike, User, MAX_RATING};

/// Text written into every generated review.
pub const REVIEW_TEXT: &str = "Nice movie!";

/// How much activity to generate for each user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityPlan {
    pub likes_per_user: usize,
    pub bookmarks_per_user: usize,
    pub reviews_per_user: usize,
}

/// Everything one user does, ready to be bulk inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserActivity {
    pub likes: Vec<Like>,
    pub bookmarks: Vec<Bookmark>,
    pub reviews: Vec<Review>,
    pub review_likes: Vec<ReviewLike>,
}

/// Rows inserted by one data generation pass, per entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub users: usize,
    pub movies: usize,
    pub likes: usize,
    pub bookmarks: usize,
    pub reviews: usize,
    pub review_likes: usize,
}

impl GenerationSummary {
    /// Total rows inserted across all entities.
    pub fn total(&self) -> usize {
        self.users + self.movies + self.likes + self.bookmarks + self.reviews + self.review_likes
    }
}

/// Splits `0..total` into consecutive ranges of at most `batch_size` items.
///
/// A `batch_size` of zero is treated as one.
///
/// # Example
///
/// ```
/// use ugcbench_core::generator::batch_ranges;
///
/// assert_eq!(batch_ranges(5, 2), vec![0..2, 2..4, 4..5]);
/// assert!(batch_ranges(0, 10).is_empty());
/// ```
pub fn batch_ranges(total: usize, batch_size: usize) -> Vec<Range<usize>> {
    let step = batch_size.max(1);
    (0..total)
        .step_by(step)
        .map(|start| start..(start + step).min(total))
        .collect()
}

/// Builds users named `User{j}` for every `j` in `range`.
pub fn user_batch(range: Range<usize>) -> Vec<User> {
    range.map(|j| User::new(format!("User{j}"))).collect()
}

/// Builds movies titled `Movie{j}` for every `j` in `range`.
pub fn movie_batch(range: Range<usize>) -> Vec<Movie> {
    range.map(|j| Movie::new(format!("Movie{j}"))).collect()
}

/// Generates one user's likes, bookmarks and reviews.
///
/// Likes and bookmarks pick distinct movies, clamped to the size of
/// `movie_ids`. Reviews pick movies with replacement, so a movie can be
/// reviewed more than once; every review gets one rating from its author.
pub fn user_activity<R>(
    user_id: Uuid,
    movie_ids: &[Uuid],
    plan: &ActivityPlan,
    rng: &mut R,
) -> UserActivity
where
    R: Rng + ?Sized,
{
    if movie_ids.is_empty() {
        return UserActivity::default();
    }

    let liked: Vec<Uuid> = movie_ids
        .choose_multiple(rng, plan.likes_per_user.min(movie_ids.len()))
        .copied()
        .collect();
    let likes = liked
        .into_iter()
        .map(|movie_id| Like::new(user_id, movie_id, random_rating(rng)))
        .collect();

    let bookmarks = movie_ids
        .choose_multiple(rng, plan.bookmarks_per_user.min(movie_ids.len()))
        .map(|&movie_id| Bookmark::new(user_id, movie_id))
        .collect();

    let mut reviews = Vec::with_capacity(plan.reviews_per_user);
    let mut review_likes = Vec::with_capacity(plan.reviews_per_user);
    for _ in 0..plan.reviews_per_user {
        let Some(&movie_id) = movie_ids.choose(rng) else {
            break;
        };
        let review = Review::new(movie_id, user_id, REVIEW_TEXT);
        review_likes.push(ReviewLike::new(user_id, review.id, random_rating(rng)));
        reviews.push(review);
    }

    UserActivity {
        likes,
        bookmarks,
        reviews,
        review_likes,
    }
}

/// Draws a rating uniformly from `0..=MAX_RATING`.
pub fn random_rating<R>(rng: &mut R) -> u8
where
    R: Rng + ?Sized,
{
    rng.random_range(0..=MAX_RATING)
}
