//! Periodic dashboard snapshot publisher.
//!
//! On every tick: fetch the recent window, score the newest reading,
//! evaluate thresholds and publish the result on the [`SnapshotBus`].
//! A database failure publishes an empty snapshot rather than skipping the
//! tick, so clients keep a steady cadence.
//!
//! [`SnapshotBus`]: kilnwatch_events::SnapshotBus

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::dashboard;
use crate::state::AppState;

/// Run the publisher loop every `interval` until `cancel` is triggered.
pub async fn run(state: AppState, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Snapshot publisher started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Snapshot publisher stopping");
                break;
            }
            _ = ticker.tick() => {
                let snapshot = dashboard::load_snapshot_or_empty(&state).await;
                let event = state.bus.publish(snapshot);
                tracing::debug!(
                    sequence = event.sequence,
                    subscribers = state.bus.subscriber_count(),
                    empty = event.snapshot.is_empty(),
                    "Snapshot published"
                );
            }
        }
    }
}
