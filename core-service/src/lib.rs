//! Smart meter digital twin: telemetry fusion and anomaly decisions.

pub mod api;
pub mod constants;
pub mod logic;
