//! Server-sent event stream of dashboard snapshots.
//!
//! A new client immediately receives a freshly computed snapshot, then every
//! snapshot the background publisher puts on the bus, until the server shuts
//! down.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use kilnwatch_core::snapshot::DashboardSnapshot;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::dashboard;
use crate::state::AppState;

/// Encode a snapshot as an SSE `data:` frame tagged with a bus sequence.
pub fn snapshot_event(sequence: u64, snapshot: &DashboardSnapshot) -> Event {
    let event = match Event::default().json_data(snapshot) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode dashboard snapshot");
            return Event::default().comment("snapshot unavailable");
        }
    };
    event.id(sequence.to_string())
}

/// GET /ws/data, GET /api/v1/stream
pub async fn stream_snapshots(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Subscribe before loading so nothing published meanwhile is missed.
    let updates = BroadcastStream::new(state.bus.subscribe());
    let initial_sequence = state.bus.last_sequence();
    let initial = dashboard::load_snapshot_or_empty(&state).await;

    tracing::info!(
        subscribers = state.bus.subscriber_count(),
        "Dashboard stream connected"
    );

    let first = tokio_stream::once(Ok::<_, Infallible>(snapshot_event(
        initial_sequence,
        &initial,
    )));
    let rest = updates.filter_map(|received| match received {
        Ok(event) => Some(Ok::<_, Infallible>(snapshot_event(
            event.sequence,
            &event.snapshot,
        ))),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "Dashboard stream lagged, skipping snapshots");
            None
        }
    });

    let stream = futures::StreamExt::take_until(
        first.chain(rest),
        state.shutdown.clone().cancelled_owned(),
    );

    Sse::new(stream).keep_alive(KeepAlive::default())
}
