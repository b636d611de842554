#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity}")]
    NotFound { entity: &'static str },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid model artifact {path}: {reason}")]
    Model { path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
