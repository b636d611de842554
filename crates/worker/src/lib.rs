//! Synthetic plant-data generator.
//!
//! [`sampler`] fabricates plausible readings; [`generator`] writes one to the
//! database on a fixed interval. The API server embeds the generator loop by
//! default; the `kilnwatch-worker` binary runs it on its own.

pub mod generator;
pub mod sampler;
pub mod shutdown;

pub use generator::GeneratorConfig;
pub use sampler::Sampler;
