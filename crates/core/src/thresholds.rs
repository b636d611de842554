//! Static threshold bands for plant telemetry.
//!
//! Pure logic. The caller fetches the reading and passes it in; the result is
//! an ordered map of field name to [`Severity`], in [`PLANT_THRESHOLDS`] order.

use indexmap::IndexMap;
use serde::Serialize;

use crate::reading::CementReading;

/// Classification of a single field against its band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Inside the band.
    Safe,
    /// Below the band.
    Warning,
    /// Above the band.
    Danger,
    /// The field was missing or not a number.
    Unknown,
    /// Output bands: below the band.
    Low,
    /// Output bands: above the band.
    Ok,
    /// Output bands: inside the band.
    Excellent,
}

/// Which label set a band reports with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandKind {
    /// `warning` / `safe` / `danger`.
    Process,
    /// `low` / `excellent` / `ok`, used for production output counters.
    Output,
}

/// An inclusive `[low, high]` band for one reading field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub field: &'static str,
    pub low: f64,
    pub high: f64,
    pub kind: BandKind,
}

impl Threshold {
    const fn process(field: &'static str, low: f64, high: f64) -> Self {
        Self {
            field,
            low,
            high,
            kind: BandKind::Process,
        }
    }

    const fn output(field: &'static str, low: f64, high: f64) -> Self {
        Self {
            field,
            low,
            high,
            kind: BandKind::Output,
        }
    }

    /// Classify a value against this band.
    pub fn classify(&self, value: Option<f64>) -> Severity {
        let Some(value) = value else {
            return Severity::Unknown;
        };
        match self.kind {
            BandKind::Process if value < self.low => Severity::Warning,
            BandKind::Process if value > self.high => Severity::Danger,
            BandKind::Process => Severity::Safe,
            BandKind::Output if value < self.low => Severity::Low,
            BandKind::Output if value > self.high => Severity::Ok,
            BandKind::Output => Severity::Excellent,
        }
    }
}

/// Bands evaluated for every dashboard snapshot, in reporting order.
pub const PLANT_THRESHOLDS: [Threshold; 8] = [
    Threshold::process("kiln_temperature", 1100.0, 1350.0),
    Threshold::process("dust_emissions", 0.0, 30.0),
    Threshold::process("co2_emissions", 0.0, 800.0),
    Threshold::process("energy_consumption", 0.0, 130.0),
    Threshold::process("oee", 65.0, 100.0),
    Threshold::process("total_cement_produced", 0.0, 10000.0),
    Threshold::output("bagging_output", 0.0, 500.0),
    Threshold::process("clinker_production_rate", 0.0, 1000.0),
];

/// Per-field classification of a reading.
pub type Alerts = IndexMap<&'static str, Severity>;

/// Evaluate arbitrary bands against a field lookup.
pub fn evaluate_with<F>(thresholds: &[Threshold], lookup: F) -> Alerts
where
    F: Fn(&str) -> Option<f64>,
{
    thresholds
        .iter()
        .map(|t| (t.field, t.classify(lookup(t.field))))
        .collect()
}

/// Evaluate [`PLANT_THRESHOLDS`] against a reading.
pub fn evaluate(reading: &CementReading) -> Alerts {
    evaluate_with(&PLANT_THRESHOLDS, |name| reading.field(name))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
