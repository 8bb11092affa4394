use uuid::Uuid;

/// Returns the cache key for a user's likes projection.
pub fn user_likes_key(user_id: Uuid) -> String {
    format!("user:{}:likes", user_id)
}

/// Returns the cache key for a user's bookmarks projection.
pub fn user_bookmarks_key(user_id: Uuid) -> String {
    format!("user:{}:bookmarks", user_id)
}

/// Returns the cache key for a movie's aggregated statistics.
pub fn movie_stats_key(movie_id: Uuid) -> String {
    format!("movie:{}:stats", movie_id)
}

/// Returns the cache key for a review's aggregated statistics.
pub fn review_stats_key(review_id: Uuid) -> String {
    format!("review:{}:stats", review_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_uuid() -> Uuid {
        Uuid::nil()
    }

    #[test]
    fn test_user_likes_key() {
        let key = user_likes_key(test_uuid());
        assert_eq!(key, "user:00000000-0000-0000-0000-000000000000:likes");
    }

    #[test]
    fn test_user_bookmarks_key() {
        let key = user_bookmarks_key(test_uuid());
        assert_eq!(key, "user:00000000-0000-0000-0000-000000000000:bookmarks");
    }

    #[test]
    fn test_movie_stats_key() {
        let key = movie_stats_key(test_uuid());
        assert_eq!(key, "movie:00000000-0000-0000-0000-000000000000:stats");
    }

    #[test]
    fn test_review_stats_key() {
        let key = review_stats_key(test_uuid());
        assert_eq!(key, "review:00000000-0000-0000-0000-000000000000:stats");
    }

    #[test]
    fn test_user_keys_do_not_collide() {
        let id = Uuid::new_v4();
        assert_ne!(user_likes_key(id), user_bookmarks_key(id));
    }
}
