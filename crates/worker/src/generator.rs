//! Fixed-interval generator loop.
//!
//! Inserts one reading immediately on start, then one per interval, until
//! cancelled. Database errors are logged and the loop keeps going.

use std::time::Duration;

use kilnwatch_core::reading::CementReading;
use kilnwatch_db::repositories::ReadingRepo;
use kilnwatch_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::sampler::Sampler;

/// Default seconds between readings.
const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Generator settings.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Time between inserted readings (default: 5 s).
    pub interval: Duration,
    /// Seed for reproducible data; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default   |
    /// |---------------------------|-----------|
    /// | `GENERATOR_INTERVAL_SECS` | `5`       |
    /// | `GENERATOR_SEED`          | (entropy) |
    pub fn from_env() -> Self {
        let interval_secs: u64 = std::env::var("GENERATOR_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_INTERVAL_SECS.to_string())
            .parse()
            .expect("GENERATOR_INTERVAL_SECS must be a valid u64");

        let seed = std::env::var("GENERATOR_SEED").ok().map(|v| {
            v.parse()
                .expect("GENERATOR_SEED must be a valid u64")
        });

        Self {
            interval: Duration::from_secs(interval_secs.max(1)),
            seed,
        }
    }

    fn sampler(&self) -> Sampler {
        match self.seed {
            Some(seed) => Sampler::from_seed(seed),
            None => Sampler::from_os_rng(),
        }
    }
}

/// Sample the reading that follows the stored latest one and insert it.
pub async fn generate_once(
    pool: &DbPool,
    sampler: &mut Sampler,
) -> Result<CementReading, sqlx::Error> {
    let previous = ReadingRepo::latest(pool).await?;
    let reading = sampler.next(previous.as_ref());
    ReadingRepo::insert(pool, &reading).await?;
    Ok(reading)
}

/// Run the generator loop until `cancel` is triggered.
pub async fn run(pool: DbPool, config: GeneratorConfig, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = config.interval.as_secs(),
        seeded = config.seed.is_some(),
        "Data generator started"
    );

    let mut sampler = config.sampler();
    // The first tick completes immediately, which gives the initial reading.
    let mut interval = tokio::time::interval(config.interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Data generator stopping");
                break;
            }
            _ = interval.tick() => {
                match generate_once(&pool, &mut sampler).await {
                    Ok(reading) => {
                        tracing::debug!(
                            timestamp = %reading.timestamp,
                            total_cement_produced = reading.total_cement_produced,
                            "Reading inserted"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Data generator: insert failed");
                    }
                }
            }
        }
    }
}
