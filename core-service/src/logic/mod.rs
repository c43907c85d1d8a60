//! Logic Module - Twin Engine & Supporting Components
//!
//! ## Architecture
//! - `telemetry/` - Samples + source adapter (manual, scenario, remote)
//! - `feed/` - Remote feed listener (MQTT) and its shared state
//! - `metrics/` - Power, billing, solar export, waveform
//! - `model/` - Outlier model trait, ONNX / envelope models, model store
//! - `threat/` - Anomaly decision engine
//! - `engine/` - One tick, frame assembly
//! - `analysis_loop` - Tick driver (control changes + remote refresh)

// Core pipeline
pub mod telemetry;
pub mod feed;
pub mod metrics;
pub mod model;
pub mod threat;
pub mod history;
pub mod engine;

// Orchestration
pub mod analysis_loop;
pub mod control;
pub mod events;

// Configuration
pub mod config;
