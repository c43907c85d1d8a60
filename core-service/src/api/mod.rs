//! API Module
//!
//! Read-only consumer surface over a running `TwinEngine`.
//!
//! Usage:
//! - `api::get_latest_frame(&engine)` - Full output of the last tick
//! - `api::get_decision(&engine)` / `api::get_metrics(&engine)` - Parts of it
//! - `api::get_waveform(&engine, &config)` - Oscilloscope trace for the last sample

pub mod commands;

pub use commands::*;
