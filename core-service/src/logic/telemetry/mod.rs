//! Telemetry Module
//!
//! Samples and the source adapter that produces one per tick.
//!
//! ## Structure
//! - `sample.rs` - Sample struct + model feature layout
//! - `source.rs` - Manual / Scenario / Remote adapter, scenario table

pub mod sample;
pub mod source;

pub use sample::{FeatureVector, Sample, FEATURE_COUNT};
pub use source::{read_sample, ManualControls, Scenario, SourceMode, UnknownScenario, SCENARIO_TABLE};
