//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use uuid::Uuid;

use ugcbench_core::domain::{Bookmark, Like, MovieStats, ReviewLike, ReviewStats};

// ============================================================================
// Rating row conversions
// ============================================================================

/// Convert a SQLite row to a Like.
///
/// Expected columns: user_id, movie_id, rating, timestamp
pub fn row_to_like(row: &Row) -> rusqlite::Result<Like> {
    let user_id: String = row.get(0)?;
    let movie_id: String = row.get(1)?;
    let rating: u8 = row.get(2)?;
    let timestamp: String = row.get(3)?;

    Ok(Like {
        user_id: parse_uuid(&user_id)?,
        movie_id: parse_uuid(&movie_id)?,
        rating,
        timestamp: parse_datetime(&timestamp)?,
    })
}

/// Convert a SQLite row to a ReviewLike.
///
/// Expected columns: user_id, review_id, rating, timestamp
pub fn row_to_review_like(row: &Row) -> rusqlite::Result<ReviewLike> {
    let user_id: String = row.get(0)?;
    let review_id: String = row.get(1)?;
    let rating: u8 = row.get(2)?;
    let timestamp: String = row.get(3)?;

    Ok(ReviewLike {
        user_id: parse_uuid(&user_id)?,
        review_id: parse_uuid(&review_id)?,
        rating,
        timestamp: parse_datetime(&timestamp)?,
    })
}

/// Convert a SQLite row to a Bookmark.
///
/// Expected columns: user_id, movie_id, timestamp
pub fn row_to_bookmark(row: &Row) -> rusqlite::Result<Bookmark> {
    let user_id: String = row.get(0)?;
    let movie_id: String = row.get(1)?;
    let timestamp: String = row.get(2)?;

    Ok(Bookmark {
        user_id: parse_uuid(&user_id)?,
        movie_id: parse_uuid(&movie_id)?,
        timestamp: parse_datetime(&timestamp)?,
    })
}

/// Convert a single-column row to a Uuid.
pub fn row_to_id(row: &Row) -> rusqlite::Result<Uuid> {
    let id: String = row.get(0)?;
    parse_uuid(&id)
}

// ============================================================================
// Aggregate conversions
// ============================================================================

/// Raw aggregate columns: likes, dislikes, average, count.
struct Aggregate {
    likes: u64,
    dislikes: u64,
    avg: Option<f64>,
    count: u64,
}

fn row_to_aggregate(row: &Row) -> rusqlite::Result<Aggregate> {
    let likes: i64 = row.get(0)?;
    let dislikes: i64 = row.get(1)?;
    let avg: Option<f64> = row.get(2)?;
    let count: i64 = row.get(3)?;

    Ok(Aggregate {
        likes: likes.max(0) as u64,
        dislikes: dislikes.max(0) as u64,
        avg,
        count: count.max(0) as u64,
    })
}

/// Convert an aggregate row to MovieStats.
///
/// Expected columns: likes, dislikes, avg(rating), count(*)
pub fn row_to_movie_stats(row: &Row) -> rusqlite::Result<MovieStats> {
    let agg = row_to_aggregate(row)?;
    Ok(MovieStats {
        total_likes: agg.likes,
        total_dislikes: agg.dislikes,
        avg_rating: agg.avg,
        total_reviews: agg.count,
    })
}

/// Convert an aggregate row to ReviewStats.
///
/// Expected columns: likes, dislikes, avg(rating), count(*)
pub fn row_to_review_stats(row: &Row) -> rusqlite::Result<ReviewStats> {
    let agg = row_to_aggregate(row)?;
    Ok(ReviewStats {
        total_likes: agg.likes,
        total_dislikes: agg.dislikes,
        avg_rating: agg.avg,
        total_ratings: agg.count,
    })
}

// ============================================================================
// Helpers
// ============================================================================

/// Parse a UUID from string.
fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Format a DateTime for SQLite storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn memory_conn() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn test_format_datetime_round_trips_through_parse() {
        let now = Utc::now();

        let parsed = parse_datetime(&format_datetime(&now)).unwrap();

        assert_eq!(parsed, now);
    }

    #[test]
    fn test_parse_uuid_rejects_garbage() {
        assert!(parse_uuid("not-a-uuid").is_err());
    }

    #[test]
    fn test_row_to_like() {
        let conn = memory_conn();
        let user_id = Uuid::new_v4();
        let movie_id = Uuid::new_v4();
        let timestamp = format_datetime(&Utc::now());

        let like = conn
            .query_row(
                "SELECT ?1, ?2, 7, ?3",
                [user_id.to_string(), movie_id.to_string(), timestamp],
                row_to_like,
            )
            .unwrap();

        assert_eq!(like.user_id, user_id);
        assert_eq!(like.movie_id, movie_id);
        assert_eq!(like.rating, 7);
    }

    #[test]
    fn test_row_to_movie_stats_empty_aggregate() {
        let conn = memory_conn();

        let stats = conn
            .query_row("SELECT 0, 0, NULL, 0", [], row_to_movie_stats)
            .unwrap();

        assert_eq!(stats, MovieStats::default());
    }

    #[test]
    fn test_row_to_review_stats() {
        let conn = memory_conn();

        let stats = conn
            .query_row("SELECT 2, 1, 5.5, 3", [], row_to_review_stats)
            .unwrap();

        assert_eq!(stats.total_likes, 2);
        assert_eq!(stats.total_dislikes, 1);
        assert_eq!(stats.avg_rating, Some(5.5));
        assert_eq!(stats.total_ratings, 3);
    }
}
