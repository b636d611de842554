//! Shared query parameter types for API handlers.

use kilnwatch_core::error::CoreError;
use kilnwatch_db::repositories::reading_repo::RECENT_LIMIT;
use serde::Deserialize;

/// Largest page a client may request.
pub const MAX_LIMIT: i64 = 100;

/// `?limit=` for listing endpoints.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

impl LimitParams {
    /// The requested limit, defaulting to the dashboard window.
    pub fn resolve(&self) -> Result<i64, CoreError> {
        let limit = self.limit.unwrap_or(RECENT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(CoreError::Validation(format!(
                "limit must be between 1 and {MAX_LIMIT}, got {limit}"
            )));
        }
        Ok(limit)
    }
}
