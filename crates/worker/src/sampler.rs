//! Plausible random plant readings.
//!
//! Production counters accumulate from the previous reading; every other
//! feature is an independent clamped Gaussian draw.

use chrono::Local;
use kilnwatch_core::reading::{CementReading, FEATURE_NAMES};
use kilnwatch_core::types::{ReadingTimestamp, TIMESTAMP_FORMAT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Tonnes added to the running total per unit of hourly production.
const TONNES_PER_UNIT: f64 = 0.035;

/// Bag mass in kilograms.
const BAG_KG: f64 = 50.0;

const PRODUCTION_TARGET: f64 = 120.0;
const CLINKER_PRODUCTION_RATE: f64 = 284.0;

/// Gaussian parameters and clamp range for one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spread {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

const fn spread(mean: f64, std_dev: f64, min: f64, max: f64) -> Spread {
    Spread {
        mean,
        std_dev,
        min,
        max,
    }
}

/// Distribution of every independently sampled feature.
pub const SPREADS: [(&str, Spread); 25] = [
    ("oee", spread(90.0, 5.0, 70.0, 100.0)),
    ("energy_consumption", spread(105.0, 10.0, 80.0, 140.0)),
    ("kiln_running_hours", spread(5.5, 2.5, 1.0, 12.0)),
    ("kiln_temperature", spread(1200.0, 50.0, 1000.0, 1600.0)),
    ("mill_throughput", spread(60.0, 15.0, 45.0, 80.0)),
    ("downtime_kiln", spread(0.5, 0.4, 0.05, 2.0)),
    ("downtime_crusher", spread(0.4, 0.3, 0.05, 2.0)),
    ("downtime_mill", spread(0.4, 0.3, 0.05, 2.0)),
    ("scheduled_maintenance", spread(0.25, 0.2, 0.05, 1.0)),
    ("unscheduled_maintenance", spread(0.3, 0.25, 0.05, 1.0)),
    ("mttr", spread(2.0, 1.2, 0.5, 5.0)),
    ("mtbf", spread(75.0, 25.0, 30.0, 150.0)),
    ("blaine_fineness", spread(3350.0, 100.0, 3100.0, 3600.0)),
    ("lime_saturation_factor", spread(1.0, 0.08, 0.85, 1.15)),
    ("free_lime_content", spread(2.0, 0.6, 0.5, 3.5)),
    ("compressive_strength_2d", spread(40.0, 3.0, 30.0, 50.0)),
    ("compressive_strength_7d", spread(43.0, 3.0, 35.0, 55.0)),
    ("compressive_strength_28d", spread(45.0, 3.0, 38.0, 60.0)),
    ("dust_emissions", spread(45.0, 5.0, 30.0, 70.0)),
    ("co2_emissions", spread(750.0, 30.0, 680.0, 820.0)),
    ("water_usage", spread(200.0, 15.0, 150.0, 250.0)),
    ("noise_levels", spread(88.0, 2.0, 80.0, 95.0)),
    ("limestone_stock", spread(1000.0, 100.0, 800.0, 1300.0)),
    ("clinker_stock", spread(825.0, 75.0, 650.0, 1000.0)),
    ("cement_stock", spread(1150.0, 100.0, 900.0, 1400.0)),
];

fn spread_for(name: &str) -> Option<Spread> {
    SPREADS.iter().find(|(n, _)| *n == name).map(|(_, s)| *s)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Random reading source.
pub struct Sampler<R = StdRng> {
    rng: R,
}

impl Sampler<StdRng> {
    /// Deterministic sampler for tests and reproducible demos.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> Sampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// One Gaussian draw, clamped to `[min, max]` and rounded to 2 decimals.
    pub fn rand_val(&mut self, spread: Spread) -> f64 {
        let value = Normal::new(spread.mean, spread.std_dev)
            .map_or(spread.mean, |normal| normal.sample(&mut self.rng));
        round2(value.clamp(spread.min, spread.max))
    }

    /// Next reading, stamped with the current local time.
    pub fn next(&mut self, previous: Option<&CementReading>) -> CementReading {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.next_at(previous, timestamp)
    }

    /// Next reading following `previous`, with an explicit timestamp.
    pub fn next_at(
        &mut self,
        previous: Option<&CementReading>,
        timestamp: impl Into<ReadingTimestamp>,
    ) -> CementReading {
        let last_total = previous
            .map(|r| r.total_cement_produced)
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);

        let hourly_production: u8 = self.rng.random_range(1..=3);
        let total = last_total + f64::from(hourly_production) * TONNES_PER_UNIT;
        let bags = (total * 1000.0 / BAG_KG).floor();

        let values = FEATURE_NAMES.map(|name| match name {
            "total_cement_produced" => total,
            "production_target" => PRODUCTION_TARGET,
            "clinker_production_rate" => CLINKER_PRODUCTION_RATE,
            "bagging_output" => bags,
            "hourly_production" => f64::from(hourly_production),
            other => spread_for(other).map_or(f64::NAN, |s| self.rand_val(s)),
        });

        CementReading::from_features(timestamp, values)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
