//! Periodic pruning of old readings.
//!
//! Keeps only the newest `max_rows` rows of `cement_data`. Runs on a fixed
//! interval using `tokio::time::interval`.

use std::time::Duration;

use kilnwatch_db::repositories::ReadingRepo;
use kilnwatch_db::DbPool;
use tokio_util::sync::CancellationToken;

/// Run the retention loop until `cancel` is triggered.
pub async fn run(pool: DbPool, max_rows: i64, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        max_rows,
        interval_secs = interval.as_secs(),
        "Reading retention job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reading retention job stopping");
                break;
            }
            _ = ticker.tick() => {
                match ReadingRepo::prune_keep_latest(&pool, max_rows).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Reading retention: purged old rows");
                        } else {
                            tracing::debug!("Reading retention: no rows to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Reading retention: cleanup failed");
                    }
                }
            }
        }
    }
}
