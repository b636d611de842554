#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use kilnwatch_api::config::ServerConfig;
use kilnwatch_api::router::build_app_router;
use kilnwatch_api::state::AppState;
use kilnwatch_core::reading::{CementReading, FEATURE_COUNT, FEATURE_NAMES};
use kilnwatch_core::scoring::isolation_forest::{IsolationTree, LEAF};
use kilnwatch_core::scoring::{AnomalyModel, IsolationForest, StandardScaler};
use kilnwatch_db::DbPool;
use kilnwatch_events::SnapshotBus;

/// Build a test `ServerConfig` with safe defaults.
///
/// The static directory does not exist, so unmatched routes return 404.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        static_dir: PathBuf::from("/nonexistent/kilnwatch-static"),
        generator_enabled: false,
        ..ServerConfig::default()
    }
}

/// Fresh in-memory database with migrations applied.
pub async fn test_pool() -> DbPool {
    let pool = kilnwatch_db::create_pool("sqlite::memory:").await.unwrap();
    kilnwatch_db::run_migrations(&pool).await.unwrap();
    pool
}

pub fn test_state(pool: DbPool, model: Option<AnomalyModel>) -> AppState {
    AppState {
        pool,
        config: Arc::new(test_config()),
        bus: Arc::new(SnapshotBus::default()),
        model: model.map(Arc::new),
        shutdown: CancellationToken::new(),
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(state: AppState) -> Router {
    build_app_router(state, &test_config())
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A reading with every thresholded field inside its band.
pub fn nominal_reading(timestamp: &str) -> CementReading {
    let values = FEATURE_NAMES.map(|name| match name {
        "total_cement_produced" => 4.2,
        "production_target" => 120.0,
        "oee" => 90.0,
        "energy_consumption" => 105.0,
        "clinker_production_rate" => 284.0,
        "kiln_temperature" => 1200.0,
        "bagging_output" => 84.0,
        "dust_emissions" => 25.0,
        "co2_emissions" => 750.0,
        _ => 1.0,
    });
    CementReading::from_features(timestamp, values)
}

/// A one-tree model that flags kiln temperatures far above nominal.
pub fn kiln_model() -> AnomalyModel {
    let (scaler, forest) = kiln_artifacts();
    AnomalyModel::new(scaler, forest).unwrap()
}

/// The fitted parts behind [`kiln_model`].
pub fn kiln_artifacts() -> (StandardScaler, IsolationForest) {
    let kiln = FEATURE_NAMES
        .iter()
        .position(|n| *n == "kiln_temperature")
        .unwrap() as i64;

    let scaler = StandardScaler {
        mean: nominal_reading("mean").features().to_vec(),
        scale: vec![50.0; FEATURE_COUNT],
    };
    let forest = IsolationForest {
        n_features: FEATURE_COUNT,
        max_samples: 256,
        offset: -0.5,
        trees: vec![IsolationTree {
            children_left: vec![1, LEAF, LEAF],
            children_right: vec![2, LEAF, LEAF],
            feature: vec![kiln, -2, -2],
            threshold: vec![2.0, -2.0, -2.0],
            n_node_samples: vec![256, 255, 1],
            features: None,
        }],
    };
    (scaler, forest)
}
