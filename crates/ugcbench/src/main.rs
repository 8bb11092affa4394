use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ugcbench::{BackendConfig, BenchmarkConfig, BenchmarkRunner, CacheBackend, StoreBackend};
use ugcbench_core::bench::{BenchmarkReport, DurationSummary, Fixtures};

/// ugcbench - Compare store and cache latency on a movie rating workload
#[derive(Parser, Debug)]
#[command(name = "ugcbench")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Persistent store to benchmark
    #[arg(long, value_enum, default_value = "sqlite", env = "STORE_BACKEND")]
    store: StoreKind,

    /// SQLite database path
    #[arg(long, default_value = "ugcbench.db", env = "SQLITE_PATH")]
    sqlite_path: String,

    /// Cache to benchmark against the store
    #[arg(long, value_enum, default_value = "memory", env = "CACHE_BACKEND")]
    cache: CacheKind,

    /// Redis connection URL
    #[arg(long, default_value = "redis://localhost:6379", env = "REDIS_URL")]
    redis_url: String,

    /// Users to generate
    #[arg(long)]
    users: Option<usize>,

    /// Movies to generate
    #[arg(long)]
    movies: Option<usize>,

    /// Ratings, bookmarks and reviews per user
    #[arg(long)]
    per_user: Option<usize>,

    /// Times each case is repeated
    #[arg(long)]
    iterations: Option<usize>,

    /// Rows per bulk insert
    #[arg(long)]
    batch_size: Option<usize>,

    /// Seed for reproducible datasets
    #[arg(long)]
    seed: Option<u64>,

    /// Skip cache warm-up
    #[arg(long)]
    no_warm_up: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StoreKind {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CacheKind {
    #[value(name = "none")]
    Off,
    Memory,
    Redis,
}

impl Cli {
    fn backends(&self) -> BackendConfig {
        let store = match self.store {
            StoreKind::Memory => StoreBackend::InMemory,
            StoreKind::Sqlite => StoreBackend::Sqlite {
                path: self.sqlite_path.clone(),
            },
        };
        let cache = match self.cache {
            CacheKind::Off => CacheBackend::None,
            CacheKind::Memory => CacheBackend::Memory,
            CacheKind::Redis => CacheBackend::Redis {
                url: self.redis_url.clone(),
            },
        };
        BackendConfig { store, cache }
    }

    fn apply(&self, config: &mut BenchmarkConfig) {
        if let Some(users) = self.users {
            config.num_users = users;
        }
        if let Some(movies) = self.movies {
            config.num_movies = movies;
        }
        if let Some(per_user) = self.per_user {
            config.likes_per_user = per_user;
            config.bookmarks_per_user = per_user;
            config.reviews_per_user = per_user;
        }
        if let Some(iterations) = self.iterations {
            config.num_iterations_per_test = iterations;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.no_warm_up {
            config.cache_warmup_enabled = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ugcbench=info".into());
    if cli.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let mut config = BenchmarkConfig::from_env();
    cli.apply(&mut config);
    config.validate()?;

    let mut runner = BenchmarkRunner::new(config, cli.backends());
    let report = runner.run().await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn ms(summary: &Option<DurationSummary>) -> String {
    match summary {
        Some(s) => format!("{:>9.3} {:>9.3} {:>9.3}", s.mean * 1e3, s.min * 1e3, s.max * 1e3),
        None => format!("{:>9} {:>9} {:>9}", "-", "-", "-"),
    }
}

fn fixtures_line(fixtures: &Fixtures) -> String {
    match fixtures.review_id {
        Some(review_id) => format!(
            "Fixtures: user {} movie {} review {}",
            fixtures.user_id, fixtures.movie_id, review_id
        ),
        None => format!(
            "Fixtures: user {} movie {}",
            fixtures.user_id, fixtures.movie_id
        ),
    }
}

fn print_report(report: &BenchmarkReport) {
    let generation = &report.generation;
    println!(
        "Generated {} users, {} movies, {} likes, {} bookmarks, {} reviews, {} review likes",
        generation.users,
        generation.movies,
        generation.likes,
        generation.bookmarks,
        generation.reviews,
        generation.review_likes
    );
    if let Some(warm_up) = &report.warm_up {
        println!(
            "Warmed {} users, {} movies, {} reviews",
            warm_up.users, warm_up.movies, warm_up.reviews
        );
    }
    println!("{}", fixtures_line(&report.fixtures));

    println!();
    println!(
        "{:<22} {:<13} {:>9} {:>9} {:>9}",
        "case", "phase", "mean ms", "min ms", "max ms"
    );
    for case in &report.static_reads {
        println!("{:<22} {:<13} {}", case.case.as_str(), "db", ms(&case.db));
        println!("{:<22} {:<13} {}", "", "cache", ms(&case.cache));
        println!(
            "{:<22} {:<13} {}/{}",
            "",
            "cache hits",
            case.cache_hits,
            case.samples.len()
        );
    }
    for case in &report.realtime {
        println!("{:<22} {:<13} {}", case.case.as_str(), "write", ms(&case.write));
        println!("{:<22} {:<13} {}", "", "cache update", ms(&case.cache_update));
        println!("{:<22} {:<13} {}", "", "read db", ms(&case.read_db));
        println!("{:<22} {:<13} {}", "", "read cache", ms(&case.read_cache));
        println!(
            "{:<22} {:<13} {}/{}",
            "",
            "cache hits",
            case.read_cache_hits,
            case.samples.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_fixtures_line_includes_review() {
        let fixtures = Fixtures {
            user_id: Uuid::new_v4(),
            movie_id: Uuid::new_v4(),
            review_id: Some(Uuid::new_v4()),
        };

        let line = fixtures_line(&fixtures);

        assert!(line.contains(&fixtures.user_id.to_string()));
        assert!(line.ends_with(&format!("review {}", fixtures.review_id.unwrap())));
    }

    #[test]
    fn test_fixtures_line_without_review() {
        let fixtures = Fixtures {
            user_id: Uuid::new_v4(),
            movie_id: Uuid::new_v4(),
            review_id: None,
        };

        let line = fixtures_line(&fixtures);

        assert!(!line.contains("review"));
        assert!(line.ends_with(&fixtures.movie_id.to_string()));
    }
}
