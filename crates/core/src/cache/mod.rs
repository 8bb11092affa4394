mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{movie_stats_key, review_stats_key, user_bookmarks_key, user_likes_key};
pub use serialization::{
    deserialize_bookmarks, deserialize_likes, deserialize_movie_stats, deserialize_review_stats,
    serialize_bookmarks, serialize_likes, serialize_movie_stats, serialize_review_stats,
    SerializationError,
};
pub use traits::{Cache, CacheRepository};
