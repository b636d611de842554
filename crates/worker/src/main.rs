use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kilnwatch_worker::shutdown::shutdown_signal;
use kilnwatch_worker::{generator, GeneratorConfig};

/// How long the generator gets to finish after cancellation.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kilnwatch_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data.db".into());

    let pool = kilnwatch_db::create_pool(&database_url)
        .await
        .expect("Failed to open database");

    kilnwatch_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!(%database_url, "Database ready");

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(generator::run(
        pool,
        GeneratorConfig::from_env(),
        cancel.clone(),
    ));

    shutdown_signal().await;
    cancel.cancel();

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, handle).await {
        Ok(Ok(())) => tracing::info!("Generator stopped"),
        Ok(Err(e)) => tracing::error!(error = %e, "Generator task failed"),
        Err(_) => tracing::warn!("Generator did not stop in time"),
    }
}
