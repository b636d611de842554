use axum::routing::get;
use axum::Router;

use crate::handlers::stream;
use crate::state::AppState;

/// Root-level stream route used by the dashboard page.
pub fn router() -> Router<AppState> {
    Router::new().route("/ws/data", get(stream::stream_snapshots))
}

/// The same stream under `/api/v1`.
pub fn api_router() -> Router<AppState> {
    Router::new().route("/stream", get(stream::stream_snapshots))
}
