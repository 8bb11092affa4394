//! Timing and report types produced by benchmark cases.
//!
//! Durations are seconds as `f64`. Cache-side fields are `None` when the run
//! has no cache configured.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::generator::GenerationSummary;

/// The five benchmark cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseKind {
    UserLikesList,
    MovieStats,
    UserBookmarksList,
    RealtimeLike,
    RealtimeReviewLike,
}

impl CaseKind {
    /// Stable name used in logs and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserLikesList => "user_likes_list",
            Self::MovieStats => "movie_stats",
            Self::UserBookmarksList => "user_bookmarks_list",
            Self::RealtimeLike => "realtime_like",
            Self::RealtimeReviewLike => "realtime_review_like",
        }
    }
}

impl fmt::Display for CaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One measurement of a static read: the same read against the store and the cache.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticReadTiming {
    pub db_secs: f64,
    pub cache_secs: Option<f64>,
    /// Whether the cache read found the projection.
    pub cache_hit: Option<bool>,
}

/// One measurement of a realtime write followed by reads on both paths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealtimeTiming {
    pub write_secs: f64,
    pub cache_update_secs: Option<f64>,
    pub read_db_secs: f64,
    pub read_cache_secs: Option<f64>,
    /// Whether the post-write cache read found the aggregate.
    pub read_cache_hit: Option<bool>,
}

impl RealtimeTiming {
    /// The measured phases in execution order, skipping those that did not run.
    pub fn durations(&self) -> Vec<f64> {
        [
            Some(self.write_secs),
            self.cache_update_secs,
            Some(self.read_db_secs),
            self.read_cache_secs,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Aggregate of a series of durations, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarizes a series of durations. Returns `None` for an empty series.
///
/// # Example
///
/// ```
/// use ugcbench_core::bench::summarize;
///
/// let summary = summarize(&[1.0, 3.0]).unwrap();
/// assert_eq!(summary.mean, 2.0);
/// assert!(summarize(&[]).is_none());
/// ```
pub fn summarize(samples: &[f64]) -> Option<DurationSummary> {
    let (&first, rest) = samples.split_first()?;
    let (min, max, sum) = rest
        .iter()
        .fold((first, first, first), |(min, max, sum), &s| {
            (min.min(s), max.max(s), sum + s)
        });

    Some(DurationSummary {
        count: samples.len(),
        mean: sum / samples.len() as f64,
        min,
        max,
    })
}

fn summarize_optional<I>(samples: I) -> Option<DurationSummary>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let values: Vec<f64> = samples.into_iter().flatten().collect();
    summarize(&values)
}

/// All iterations of one static read case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticReadReport {
    pub case: CaseKind,
    pub samples: Vec<StaticReadTiming>,
    pub db: Option<DurationSummary>,
    pub cache: Option<DurationSummary>,
    pub cache_hits: usize,
}

impl StaticReadReport {
    pub fn from_samples(case: CaseKind, samples: Vec<StaticReadTiming>) -> Self {
        let db_secs: Vec<f64> = samples.iter().map(|s| s.db_secs).collect();
        let cache_hits = samples
            .iter()
            .filter(|s| s.cache_hit == Some(true))
            .count();

        Self {
            case,
            db: summarize(&db_secs),
            cache: summarize_optional(samples.iter().map(|s| s.cache_secs)),
            cache_hits,
            samples,
        }
    }
}

/// All iterations of one realtime case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeReport {
    pub case: CaseKind,
    pub samples: Vec<RealtimeTiming>,
    pub write: Option<DurationSummary>,
    pub cache_update: Option<DurationSummary>,
    pub read_db: Option<DurationSummary>,
    pub read_cache: Option<DurationSummary>,
    /// Post-write cache reads that found the aggregate. Expected to be zero.
    pub read_cache_hits: usize,
}

impl RealtimeReport {
    pub fn from_samples(case: CaseKind, samples: Vec<RealtimeTiming>) -> Self {
        let write: Vec<f64> = samples.iter().map(|s| s.write_secs).collect();
        let read_db: Vec<f64> = samples.iter().map(|s| s.read_db_secs).collect();
        let read_cache_hits = samples
            .iter()
            .filter(|s| s.read_cache_hit == Some(true))
            .count();

        Self {
            case,
            write: summarize(&write),
            cache_update: summarize_optional(samples.iter().map(|s| s.cache_update_secs)),
            read_db: summarize(&read_db),
            read_cache: summarize_optional(samples.iter().map(|s| s.read_cache_secs)),
            read_cache_hits,
            samples,
        }
    }
}

/// Entities the cases ran against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixtures {
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub review_id: Option<Uuid>,
}

/// Projections loaded into the cache before the cases ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmUpSummary {
    pub users: usize,
    pub movies: usize,
    pub reviews: usize,
}

/// Outcome of a complete benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generation: GenerationSummary,
    pub warm_up: Option<WarmUpSummary>,
    pub fixtures: Fixtures,
    pub static_reads: Vec<StaticReadReport>,
    pub realtime: Vec<RealtimeReport>,
}

impl BenchmarkReport {
    /// Looks up a static read case by kind.
    pub fn static_read(&self, case: CaseKind) -> Option<&StaticReadReport> {
        self.static_reads.iter().find(|r| r.case == case)
    }

    /// Looks up a realtime case by kind.
    pub fn realtime_case(&self, case: CaseKind) -> Option<&RealtimeReport> {
        self.realtime.iter().find(|r| r.case == case)
    }
}
