//! Anomaly scoring with a pre-fitted scaler and isolation forest.
//!
//! Both artifacts are produced outside this repository and exported as JSON.
//! This module only loads and applies them.

pub mod isolation_forest;
pub mod scaler;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CoreError;
use crate::reading::{CementReading, FEATURE_COUNT};

pub use isolation_forest::IsolationForest;
pub use scaler::StandardScaler;

/// Binary anomaly label attached to dashboard readings.
///
/// Serialized as `0` (normal) or `1` (anomaly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyFlag {
    Normal,
    Anomaly,
}

impl AnomalyFlag {
    /// Map an outlier-model label (`-1` outlier, `1` inlier).
    pub fn from_prediction(label: i8) -> Self {
        if label == -1 {
            Self::Anomaly
        } else {
            Self::Normal
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Anomaly => 1,
        }
    }
}

impl Serialize for AnomalyFlag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// A loaded scaler + outlier model pair.
#[derive(Debug, Clone)]
pub struct AnomalyModel {
    scaler: StandardScaler,
    forest: IsolationForest,
}

impl AnomalyModel {
    /// Pair a scaler with a forest, checking both fit [`FEATURE_COUNT`] inputs.
    pub fn new(scaler: StandardScaler, forest: IsolationForest) -> Result<Self, CoreError> {
        scaler
            .validate(FEATURE_COUNT)
            .map_err(|reason| model_error("scaler", reason))?;
        forest
            .validate(FEATURE_COUNT)
            .map_err(|reason| model_error("isolation forest", reason))?;
        Ok(Self { scaler, forest })
    }

    /// Load both artifacts from JSON files.
    pub fn load(scaler_path: &Path, model_path: &Path) -> Result<Self, CoreError> {
        let scaler: StandardScaler = read_artifact(scaler_path)?;
        let forest: IsolationForest = read_artifact(model_path)?;

        scaler
            .validate(FEATURE_COUNT)
            .map_err(|reason| model_error(&scaler_path.display().to_string(), reason))?;
        forest
            .validate(FEATURE_COUNT)
            .map_err(|reason| model_error(&model_path.display().to_string(), reason))?;

        tracing::info!(
            scaler = %scaler_path.display(),
            model = %model_path.display(),
            trees = forest.trees.len(),
            "Loaded anomaly model"
        );

        Ok(Self { scaler, forest })
    }

    fn scaled(&self, reading: &CementReading) -> Result<Vec<f64>, CoreError> {
        let scaled = self.scaler.transform(&reading.features())?;
        if scaled.iter().any(|v| !v.is_finite()) {
            return Err(CoreError::Validation(format!(
                "reading {} has non-finite features",
                reading.timestamp
            )));
        }
        Ok(scaled)
    }

    /// Raw anomaly score of a reading (higher is more anomalous).
    pub fn score(&self, reading: &CementReading) -> Result<f64, CoreError> {
        Ok(self.forest.score(&self.scaled(reading)?))
    }

    /// Scale the reading and label it normal or anomalous.
    pub fn detect(&self, reading: &CementReading) -> Result<AnomalyFlag, CoreError> {
        let label = self.forest.predict(&self.scaled(reading)?);
        Ok(AnomalyFlag::from_prediction(label))
    }
}

fn model_error(path: &str, reason: String) -> CoreError {
    CoreError::Model {
        path: path.to_string(),
        reason,
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, CoreError> {
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| model_error(&path.display().to_string(), e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
