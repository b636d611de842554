use axum::routing::get;
use axum::Router;

use crate::handlers::readings;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/readings", get(readings::list_recent))
        .route("/readings/latest", get(readings::get_latest))
        .route("/snapshot", get(readings::get_snapshot))
}
