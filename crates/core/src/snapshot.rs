//! The dashboard payload: latest reading, its anomaly label, and field alerts.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::reading::CementReading;
use crate::scoring::{AnomalyFlag, AnomalyModel};
use crate::thresholds::{self, Alerts};

/// A reading annotated with its anomaly label.
///
/// `anomaly` is omitted when no model is loaded or scoring failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredReading {
    #[serde(flatten)]
    pub reading: CementReading,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anomaly: Option<AnomalyFlag>,
}

/// What every connected dashboard receives.
///
/// Serializes as `{"latest": {...}, "alerts": {...}}`; both objects are empty
/// when no reading has been stored yet.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardSnapshot {
    #[serde(serialize_with = "empty_object_if_none")]
    pub latest: Option<ScoredReading>,
    pub alerts: Alerts,
}

impl DashboardSnapshot {
    /// Score and evaluate the newest reading.
    ///
    /// Scoring errors are logged and leave `anomaly` unset; the thresholds are
    /// still reported.
    pub fn build(latest: Option<CementReading>, model: Option<&AnomalyModel>) -> Self {
        let Some(reading) = latest else {
            return Self::default();
        };

        let anomaly = model.and_then(|model| match model.detect(&reading) {
            Ok(flag) => Some(flag),
            Err(e) => {
                tracing::error!(error = %e, timestamp = %reading.timestamp, "Anomaly scoring failed");
                None
            }
        });
        let alerts = thresholds::evaluate(&reading);

        Self {
            latest: Some(ScoredReading { reading, anomaly }),
            alerts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_none()
    }
}

fn empty_object_if_none<S: Serializer>(
    latest: &Option<ScoredReading>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match latest {
        Some(scored) => scored.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
