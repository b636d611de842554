//! Shared response envelope types for API handlers.
//!
//! REST responses use a `{ "data": ... }` envelope. The snapshot and stream
//! endpoints send the bare snapshot, which is what the dashboard consumes.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
