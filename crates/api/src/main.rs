use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kilnwatch_api::background::{retention, snapshot_publisher};
use kilnwatch_api::config::ServerConfig;
use kilnwatch_api::router::build_app_router;
use kilnwatch_api::state::{self, AppState};
use kilnwatch_worker::shutdown::shutdown_signal;
use kilnwatch_worker::{generator, GeneratorConfig};

/// How long each background task gets to finish after cancellation.
const TASK_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kilnwatch_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = kilnwatch_db::create_pool(&config.database_url)
        .await
        .expect("Failed to open database");
    tracing::info!(database_url = %config.database_url, "Database connection pool created");

    kilnwatch_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    kilnwatch_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Anomaly model ---
    let model = state::load_model(&config).expect("Failed to load anomaly model");
    if model.is_none() {
        tracing::warn!("SCALER_PATH / MODEL_PATH not set, anomaly scoring disabled");
    }

    let cancel = CancellationToken::new();

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        bus: Arc::new(kilnwatch_events::SnapshotBus::default()),
        model: model.map(Arc::new),
        shutdown: cancel.clone(),
    };

    // --- Background tasks ---
    let mut tasks = Vec::new();

    if config.generator_enabled {
        tasks.push((
            "generator",
            tokio::spawn(generator::run(
                pool.clone(),
                GeneratorConfig::from_env(),
                cancel.clone(),
            )),
        ));
    } else {
        tracing::info!("Embedded data generator disabled");
    }

    tasks.push((
        "snapshot publisher",
        tokio::spawn(snapshot_publisher::run(
            state.clone(),
            Duration::from_secs(config.stream_interval_secs),
            cancel.clone(),
        )),
    ));

    if let Some(max_rows) = config.retention_max_rows {
        tasks.push((
            "retention",
            tokio::spawn(retention::run(
                pool.clone(),
                max_rows,
                Duration::from_secs(config.retention_interval_secs),
                cancel.clone(),
            )),
        ));
    }

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // Event streams only end when the shutdown token fires.
    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            shutdown.cancel();
        })
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cancel.cancel();
    for (name, handle) in tasks {
        match tokio::time::timeout(TASK_SHUTDOWN_TIMEOUT, handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(task = name, error = %e, "Background task failed"),
            Err(_) => tracing::warn!(task = name, "Background task did not stop in time"),
        }
    }

    tracing::info!("Graceful shutdown complete");
}
