//! In-process fan-out of dashboard snapshots.
//!
//! - [`SnapshotBus`]: publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DashboardEvent`]: a published snapshot with its sequence number.

pub mod bus;

pub use bus::{DashboardEvent, SnapshotBus};
