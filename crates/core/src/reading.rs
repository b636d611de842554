//! The plant sensor reading and its canonical feature order.
//!
//! The feature order is shared by the database schema, the scaler and the
//! outlier model. Changing it invalidates previously exported model
//! artifacts.

use serde::{Deserialize, Serialize};

use crate::types::ReadingTimestamp;

/// Number of numeric features in a [`CementReading`].
pub const FEATURE_COUNT: usize = 30;

macro_rules! define_reading {
    ($($field:ident),+ $(,)?) => {
        /// One row of plant telemetry.
        ///
        /// All features are stored as `f64`, including the integral counters
        /// (`bagging_output`, `hourly_production`).
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct CementReading {
            pub timestamp: ReadingTimestamp,
            $(pub $field: f64,)+
        }

        /// Feature names in model input order.
        pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [$(stringify!($field)),+];

        impl CementReading {
            /// Build a reading from a feature vector in [`FEATURE_NAMES`] order.
            pub fn from_features(
                timestamp: impl Into<ReadingTimestamp>,
                values: [f64; FEATURE_COUNT],
            ) -> Self {
                let [$($field),+] = values;
                Self {
                    timestamp: timestamp.into(),
                    $($field,)+
                }
            }

            /// The feature vector in [`FEATURE_NAMES`] order.
            pub fn features(&self) -> [f64; FEATURE_COUNT] {
                [$(self.$field),+]
            }

            /// Look up a feature by column name.
            ///
            /// Returns `None` for unknown names and for NaN values, which the
            /// threshold evaluator reports as `unknown`.
            pub fn field(&self, name: &str) -> Option<f64> {
                let value = match name {
                    $(stringify!($field) => self.$field,)+
                    _ => return None,
                };
                (!value.is_nan()).then_some(value)
            }
        }
    };
}

define_reading!(
    total_cement_produced,
    production_target,
    oee,
    energy_consumption,
    clinker_production_rate,
    kiln_running_hours,
    kiln_temperature,
    mill_throughput,
    bagging_output,
    downtime_kiln,
    downtime_crusher,
    downtime_mill,
    scheduled_maintenance,
    unscheduled_maintenance,
    mttr,
    mtbf,
    blaine_fineness,
    lime_saturation_factor,
    free_lime_content,
    compressive_strength_2d,
    compressive_strength_7d,
    compressive_strength_28d,
    dust_emissions,
    co2_emissions,
    water_usage,
    noise_levels,
    limestone_stock,
    clinker_stock,
    cement_stock,
    hourly_production,
);

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
