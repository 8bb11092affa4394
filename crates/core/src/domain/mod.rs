mod rating;
mod stats;
mod types;

pub use rating::{validate_rating, RatingError, MAX_RATING};
pub use stats::{MovieStats, ReviewStats, LIKE_THRESHOLD};
pub use types::{
    bookmarks_projection, likes_projection, Bookmark, CachedUserBookmarks, CachedUserLikes, Like,
    Movie, Review, ReviewLike, User,
};
