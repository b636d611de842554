use std::sync::Arc;

use kilnwatch_core::error::CoreError;
use kilnwatch_core::scoring::AnomalyModel;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: kilnwatch_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Fan-out hub for dashboard snapshots.
    pub bus: Arc<kilnwatch_events::SnapshotBus>,
    /// Loaded scaler + outlier model; `None` when scoring is disabled.
    pub model: Option<Arc<AnomalyModel>>,
    /// Cancelled on shutdown; ends open event streams.
    pub shutdown: CancellationToken,
}

/// Load the anomaly model named by the configuration.
///
/// Returns `Ok(None)` when neither artifact path is set. Setting only one of
/// them is a configuration error.
pub fn load_model(config: &ServerConfig) -> Result<Option<AnomalyModel>, CoreError> {
    match (&config.scaler_path, &config.model_path) {
        (Some(scaler), Some(model)) => AnomalyModel::load(scaler, model).map(Some),
        (None, None) => Ok(None),
        _ => Err(CoreError::Validation(
            "SCALER_PATH and MODEL_PATH must be set together".to_string(),
        )),
    }
}
