//! REST handlers for stored readings and the current snapshot.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use kilnwatch_core::error::CoreError;
use kilnwatch_core::reading::CementReading;
use kilnwatch_core::snapshot::DashboardSnapshot;
use kilnwatch_db::repositories::ReadingRepo;

use crate::dashboard;
use crate::error::{AppError, AppResult};
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /readings?limit=N
///
/// The newest `N` readings (default 10, at most 100), newest first.
pub async fn list_recent(
    State(state): State<AppState>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> AppResult<Json<DataResponse<Vec<CementReading>>>> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let limit = params.resolve()?;
    let readings = ReadingRepo::recent(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: readings }))
}

/// GET /readings/latest
///
/// The newest raw reading; 404 when nothing has been stored yet.
pub async fn get_latest(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CementReading>>> {
    let reading = ReadingRepo::latest(&state.pool)
        .await?
        .ok_or(CoreError::NotFound { entity: "reading" })?;
    Ok(Json(DataResponse { data: reading }))
}

/// GET /snapshot
///
/// The same payload the stream pushes, computed on demand.
pub async fn get_snapshot(State(state): State<AppState>) -> AppResult<Json<DashboardSnapshot>> {
    let snapshot = dashboard::load_snapshot(&state).await?;
    Ok(Json(snapshot))
}
