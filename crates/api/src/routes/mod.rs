pub mod health;
pub mod readings;
pub mod stream;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /stream                 server-sent snapshot stream
/// /snapshot               current snapshot (GET)
/// /readings               newest readings, ?limit= (GET)
/// /readings/latest        newest reading (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(stream::api_router())
        .merge(readings::router())
}
