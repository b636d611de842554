//! Domain logic for the cement-plant monitoring dashboard.
//!
//! Pure logic only: no database or network access. The `db` crate persists
//! [`reading::CementReading`]s, the `api` crate composes them into
//! [`snapshot::DashboardSnapshot`]s using [`scoring`] and [`thresholds`].

pub mod error;
pub mod reading;
pub mod scoring;
pub mod snapshot;
pub mod thresholds;
pub mod types;
