//! Aggregate statistics derived from rating rows.
//!
//! Ratings at or above [`LIKE_THRESHOLD`] count as likes, everything below as
//! dislikes. An aggregate over zero ratings has no average rather than an
//! average of zero.

use serde::{Deserialize, Serialize};

/// Lowest rating that counts as a like.
pub const LIKE_THRESHOLD: u8 = 6;

/// Aggregated ratings for one movie.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieStats {
    pub total_likes: u64,
    pub total_dislikes: u64,
    pub avg_rating: Option<f64>,
    /// Number of rating events (Like rows) for the movie, not written reviews.
    pub total_reviews: u64,
}

impl MovieStats {
    /// Derives movie statistics from the full rating distribution.
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let tally = Tally::from_ratings(ratings);
        Self {
            total_likes: tally.likes,
            total_dislikes: tally.dislikes,
            avg_rating: tally.average(),
            total_reviews: tally.count,
        }
    }
}

/// Aggregated ratings for one review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub total_likes: u64,
    pub total_dislikes: u64,
    pub avg_rating: Option<f64>,
    pub total_ratings: u64,
}

impl ReviewStats {
    /// Derives review statistics from the full rating distribution.
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let tally = Tally::from_ratings(ratings);
        Self {
            total_likes: tally.likes,
            total_dislikes: tally.dislikes,
            avg_rating: tally.average(),
            total_ratings: tally.count,
        }
    }
}

#[derive(Default)]
struct Tally {
    likes: u64,
    dislikes: u64,
    count: u64,
    sum: u64,
}

impl Tally {
    fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        ratings.into_iter().fold(Self::default(), |mut tally, rating| {
            if rating >= LIKE_THRESHOLD {
                tally.likes += 1;
            } else {
                tally.dislikes += 1;
            }
            tally.count += 1;
            tally.sum += u64::from(rating);
            tally
        })
    }

    fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum as f64 / self.count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_stats_empty_has_no_average() {
        let stats = MovieStats::from_ratings(std::iter::empty());

        assert_eq!(stats, MovieStats::default());
        assert_eq!(stats.avg_rating, None);
        assert_eq!(stats.total_reviews, 0);
    }

    #[test]
    fn test_movie_stats_threshold_split() {
        let stats = MovieStats::from_ratings([5, 6, 10, 0]);

        assert_eq!(stats.total_likes, 2);
        assert_eq!(stats.total_dislikes, 2);
        assert_eq!(stats.total_reviews, 4);
        assert_eq!(stats.avg_rating, Some(5.25));
    }

    #[test]
    fn test_review_stats_counts_ratings() {
        let stats = ReviewStats::from_ratings([7, 7, 1]);

        assert_eq!(stats.total_likes, 2);
        assert_eq!(stats.total_dislikes, 1);
        assert_eq!(stats.total_ratings, 3);
        assert_eq!(stats.avg_rating, Some(5.0));
    }

    #[test]
    fn test_review_stats_empty() {
        let stats = ReviewStats::from_ratings(Vec::new());

        assert_eq!(stats.total_ratings, 0);
        assert!(stats.avg_rating.is_none());
    }
}
