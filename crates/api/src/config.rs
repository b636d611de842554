use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// SQLite database URL (default: `sqlite://data.db`).
    pub database_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`). Does not bound
    /// streaming responses once their headers are sent.
    pub request_timeout_secs: u64,
    /// Seconds between published dashboard snapshots (default: `5`).
    pub stream_interval_secs: u64,
    /// Directory served at `/` when it exists (default: `static`).
    pub static_dir: PathBuf,
    /// Fitted scaler artifact. Scoring is disabled unless both artifact
    /// paths are set.
    pub scaler_path: Option<PathBuf>,
    /// Fitted isolation forest artifact.
    pub model_path: Option<PathBuf>,
    /// Run the synthetic data generator inside the server (default: `true`).
    pub generator_enabled: bool,
    /// Keep at most this many readings; unset disables pruning.
    pub retention_max_rows: Option<i64>,
    /// Seconds between retention passes (default: `60`).
    pub retention_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: "sqlite://data.db".to_string(),
            cors_origins: vec!["http://localhost:5173".to_string()],
            request_timeout_secs: 30,
            stream_interval_secs: 5,
            static_dir: PathBuf::from("static"),
            scaler_path: None,
            model_path: None,
            generator_enabled: true,
            retention_max_rows: None,
            retention_interval_secs: 60,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `DATABASE_URL`            | `sqlite://data.db`         |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `STREAM_INTERVAL_SECS`    | `5`                        |
    /// | `STATIC_DIR`              | `static`                   |
    /// | `SCALER_PATH`             | (unset)                    |
    /// | `MODEL_PATH`              | (unset)                    |
    /// | `GENERATOR_ENABLED`       | `true`                     |
    /// | `RETENTION_MAX_ROWS`      | (unset)                    |
    /// | `RETENTION_INTERVAL_SECS` | `60`                       |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = std::env::var("HOST").unwrap_or(defaults.host);

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let database_url = std::env::var("DATABASE_URL").unwrap_or(defaults.database_url);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let stream_interval_secs: u64 = std::env::var("STREAM_INTERVAL_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("STREAM_INTERVAL_SECS must be a valid u64");

        let static_dir = std::env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        let scaler_path = std::env::var("SCALER_PATH").ok().map(PathBuf::from);
        let model_path = std::env::var("MODEL_PATH").ok().map(PathBuf::from);

        let generator_enabled = std::env::var("GENERATOR_ENABLED")
            .map(|v| parse_bool(&v).expect("GENERATOR_ENABLED must be true or false"))
            .unwrap_or(true);

        let retention_max_rows = std::env::var("RETENTION_MAX_ROWS").ok().map(|v| {
            v.parse::<i64>()
                .ok()
                .filter(|n| *n > 0)
                .expect("RETENTION_MAX_ROWS must be a positive integer")
        });

        let retention_interval_secs: u64 = std::env::var("RETENTION_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("RETENTION_INTERVAL_SECS must be a valid u64");

        Self {
            host,
            port,
            database_url,
            cors_origins,
            request_timeout_secs,
            stream_interval_secs: stream_interval_secs.max(1),
            static_dir,
            scaler_path,
            model_path,
            generator_enabled,
            retention_max_rows,
            retention_interval_secs: retention_interval_secs.max(1),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
