//! Composition of the dashboard snapshot from the store and the model.

use kilnwatch_core::snapshot::DashboardSnapshot;
use kilnwatch_db::repositories::reading_repo::RECENT_LIMIT;
use kilnwatch_db::repositories::ReadingRepo;

use crate::state::AppState;

/// Fetch the recent window, score the newest reading and evaluate thresholds.
pub async fn load_snapshot(state: &AppState) -> Result<DashboardSnapshot, sqlx::Error> {
    let recent = ReadingRepo::recent(&state.pool, RECENT_LIMIT).await?;
    Ok(DashboardSnapshot::build(
        recent.into_iter().next(),
        state.model.as_deref(),
    ))
}

/// Like [`load_snapshot`], but a database failure yields an empty snapshot so
/// connected dashboards keep receiving events.
pub async fn load_snapshot_or_empty(state: &AppState) -> DashboardSnapshot {
    match load_snapshot(state).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load dashboard snapshot");
            DashboardSnapshot::default()
        }
    }
}
