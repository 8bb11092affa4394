use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user who rates, bookmarks and reviews movies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
}

impl User {
    /// Creates a new user with a random ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    /// Sets a specific ID for this user (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// A movie that can be rated, bookmarked and reviewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
}

impl Movie {
    /// Creates a new movie with a random ID.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
        }
    }

    /// Sets a specific ID for this movie (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// A user's rating of a movie.
///
/// At most one exists per `(user_id, movie_id)`; voting again replaces the
/// rating and the timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user_id: Uuid,
    pub movie_id: Uuid,
    /// 0..=10
    pub rating: u8,
    pub timestamp: DateTime<Utc>,
}

impl Like {
    /// Creates a rating stamped with the current time.
    pub fn new(user_id: Uuid, movie_id: Uuid, rating: u8) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
            timestamp: Utc::now(),
        }
    }

    /// Sets a specific timestamp for this rating.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// A movie saved by a user for later. One per `(user_id, movie_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl Bookmark {
    /// Creates a bookmark stamped with the current time.
    pub fn new(user_id: Uuid, movie_id: Uuid) -> Self {
        Self {
            user_id,
            movie_id,
            timestamp: Utc::now(),
        }
    }

    /// Sets a specific timestamp for this bookmark.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// A written review. A user may review the same movie more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub movie_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Creates a new review with a random ID, stamped with the current time.
    pub fn new(movie_id: Uuid, user_id: Uuid, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            movie_id,
            user_id,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    /// Sets a specific ID for this review (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Sets a specific creation time for this review.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// A user's rating of a review. One per `(user_id, review_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewLike {
    pub user_id: Uuid,
    pub review_id: Uuid,
    /// 0..=10
    pub rating: u8,
    pub timestamp: DateTime<Utc>,
}

impl ReviewLike {
    /// Creates a review rating stamped with the current time.
    pub fn new(user_id: Uuid, review_id: Uuid, rating: u8) -> Self {
        Self {
            user_id,
            review_id,
            rating,
            timestamp: Utc::now(),
        }
    }

    /// Sets a specific timestamp for this review rating.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Cache projection of every rating a user has given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedUserLikes {
    pub user_id: Uuid,
    /// movie_id -> rating
    pub likes: HashMap<Uuid, u8>,
}

/// Cache projection of every movie a user has bookmarked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedUserBookmarks {
    pub user_id: Uuid,
    pub bookmarks: HashSet<Uuid>,
}

/// Folds a user's like rows into the shape held by the cache.
pub fn likes_projection(likes: &[Like]) -> HashMap<Uuid, u8> {
    likes.iter().map(|l| (l.movie_id, l.rating)).collect()
}

/// Folds a user's bookmark rows into the shape held by the cache.
pub fn bookmarks_projection(bookmarks: &[Bookmark]) -> HashSet<Uuid> {
    bookmarks.iter().map(|b| b.movie_id).collect()
}
