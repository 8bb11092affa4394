//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Ratings of 6 and above count as likes; the threshold is
//! spelled out in the aggregate queries below.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS movies (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS likes (
    user_id TEXT NOT NULL,
    movie_id TEXT NOT NULL,
    rating INTEGER NOT NULL CHECK (rating BETWEEN 0 AND 10),
    timestamp TEXT NOT NULL,
    PRIMARY KEY (user_id, movie_id)
);

CREATE TABLE IF NOT EXISTS bookmarks (
    user_id TEXT NOT NULL,
    movie_id TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    PRIMARY KEY (user_id, movie_id)
);

CREATE TABLE IF NOT EXISTS reviews (
    id TEXT PRIMARY KEY,
    movie_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    text TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS review_likes (
    user_id TEXT NOT NULL,
    review_id TEXT NOT NULL,
    rating INTEGER NOT NULL CHECK (rating BETWEEN 0 AND 10),
    timestamp TEXT NOT NULL,
    PRIMARY KEY (user_id, review_id)
);

CREATE INDEX IF NOT EXISTS idx_likes_movie_id ON likes(movie_id);
CREATE INDEX IF NOT EXISTS idx_review_likes_review_id ON review_likes(review_id);
"#;

// User queries
pub const INSERT_USER: &str = r#"
INSERT INTO users (id, name)
VALUES (?1, ?2)
"#;

pub const INSERT_OR_IGNORE_USER: &str = r#"
INSERT OR IGNORE INTO users (id, name)
VALUES (?1, ?2)
"#;

pub const SELECT_RANDOM_USER_IDS: &str = r#"
SELECT id FROM users
ORDER BY RANDOM()
LIMIT ?1
"#;

pub const SELECT_USER_IDS_PAGE: &str = r#"
SELECT id FROM users
ORDER BY rowid
LIMIT ?1 OFFSET ?2
"#;

pub const COUNT_USERS: &str = "SELECT COUNT(*) FROM users";

// Movie queries
pub const INSERT_MOVIE: &str = r#"
INSERT INTO movies (id, title)
VALUES (?1, ?2)
"#;

pub const INSERT_OR_IGNORE_MOVIE: &str = r#"
INSERT OR IGNORE INTO movies (id, title)
VALUES (?1, ?2)
"#;

pub const SELECT_RANDOM_MOVIE_IDS: &str = r#"
SELECT id FROM movies
ORDER BY RANDOM()
LIMIT ?1
"#;

pub const SELECT_MOVIE_IDS_PAGE: &str = r#"
SELECT id FROM movies
ORDER BY rowid
LIMIT ?1 OFFSET ?2
"#;

pub const COUNT_MOVIES: &str = "SELECT COUNT(*) FROM movies";

// Like queries
pub const UPSERT_LIKE: &str = r#"
INSERT INTO likes (user_id, movie_id, rating, timestamp)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT (user_id, movie_id) DO UPDATE SET
    rating = excluded.rating,
    timestamp = excluded.timestamp
RETURNING user_id, movie_id, rating, timestamp
"#;

pub const INSERT_OR_IGNORE_LIKE: &str = r#"
INSERT OR IGNORE INTO likes (user_id, movie_id, rating, timestamp)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const DELETE_LIKE: &str = r#"
DELETE FROM likes
WHERE user_id = ?1 AND movie_id = ?2
"#;

pub const SELECT_LIKES_BY_USER: &str = r#"
SELECT user_id, movie_id, rating, timestamp
FROM likes
WHERE user_id = ?1
"#;

pub const SELECT_MOVIE_STATS: &str = r#"
SELECT
    COALESCE(SUM(CASE WHEN rating >= 6 THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN rating < 6 THEN 1 ELSE 0 END), 0),
    AVG(rating),
    COUNT(*)
FROM likes
WHERE movie_id = ?1
"#;

// Bookmark queries
pub const INSERT_OR_IGNORE_BOOKMARK: &str = r#"
INSERT OR IGNORE INTO bookmarks (user_id, movie_id, timestamp)
VALUES (?1, ?2, ?3)
"#;

pub const DELETE_BOOKMARK: &str = r#"
DELETE FROM bookmarks
WHERE user_id = ?1 AND movie_id = ?2
"#;

pub const SELECT_BOOKMARKS_BY_USER: &str = r#"
SELECT user_id, movie_id, timestamp
FROM bookmarks
WHERE user_id = ?1
"#;

// Review queries
pub const INSERT_REVIEW: &str = r#"
INSERT INTO reviews (id, movie_id, user_id, text, created_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const INSERT_OR_IGNORE_REVIEW: &str = r#"
INSERT OR IGNORE INTO reviews (id, movie_id, user_id, text, created_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_RANDOM_REVIEW_IDS: &str = r#"
SELECT id FROM reviews
ORDER BY RANDOM()
LIMIT ?1
"#;

// Review like queries
pub const UPSERT_REVIEW_LIKE: &str = r#"
INSERT INTO review_likes (user_id, review_id, rating, timestamp)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT (user_id, review_id) DO UPDATE SET
    rating = excluded.rating,
    timestamp = excluded.timestamp
RETURNING user_id, review_id, rating, timestamp
"#;

pub const INSERT_OR_IGNORE_REVIEW_LIKE: &str = r#"
INSERT OR IGNORE INTO review_likes (user_id, review_id, rating, timestamp)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const DELETE_REVIEW_LIKE: &str = r#"
DELETE FROM review_likes
WHERE user_id = ?1 AND review_id = ?2
"#;

pub const SELECT_REVIEW_STATS: &str = r#"
SELECT
    COALESCE(SUM(CASE WHEN rating >= 6 THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN rating < 6 THEN 1 ELSE 0 END), 0),
    AVG(rating),
    COUNT(*)
FROM review_likes
WHERE review_id = ?1
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use ugcbench_core::domain::LIKE_THRESHOLD;

    #[test]
    fn test_stats_queries_use_like_threshold() {
        let likes = format!("rating >= {LIKE_THRESHOLD}");
        let dislikes = format!("rating < {LIKE_THRESHOLD}");

        for query in [SELECT_MOVIE_STATS, SELECT_REVIEW_STATS] {
            assert!(query.contains(&likes));
            assert!(query.contains(&dislikes));
        }
    }
}
