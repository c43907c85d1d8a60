//! Consumer Commands - Read-only accessors for dashboards and exporters
//!
//! Nothing here mutates the engine; control changes go through
//! `logic::control`.

use serde::Serialize;

use crate::constants;
use crate::logic::config::TwinConfig;
use crate::logic::engine::{Frame, TwinEngine};
use crate::logic::feed::{FeedStats, FeedStatus};
use crate::logic::history::HistoryStatus;
use crate::logic::metrics::{self, MetricsRecord, WaveformPoint};
use crate::logic::model::ModelMetadata;
use crate::logic::threat::DecisionRecord;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Remote feed connectivity for the status badge
#[derive(Debug, Clone, Serialize)]
pub struct FeedInfo {
    pub enabled: bool,
    pub status: FeedStatus,
    pub label: &'static str,
    pub stats: FeedStats,
    /// Receive time of the last accepted remote reading (RFC 3339)
    pub last_received: Option<String>,
}

/// Outlier model status
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub metadata: ModelMetadata,
    pub reduced_confidence: bool,
}

/// Oscilloscope trace for the last sample
#[derive(Debug, Clone, Serialize)]
pub struct WaveformView {
    pub amplitude: f64,
    pub frequency_hz: f64,
    pub points: Vec<WaveformPoint>,
}

/// Engine summary
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub app_name: &'static str,
    pub version: &'static str,
    pub ticks: u64,
    pub last_tick_time: Option<String>,
    pub history: HistoryStatus,
    pub feed_status: FeedStatus,
    pub model: ModelStatus,
}

// ============================================================================
// FRAME COMMANDS
// ============================================================================

/// Output of the last tick, `None` before the first tick
pub fn get_latest_frame(engine: &TwinEngine) -> Option<Frame> {
    engine.publisher().latest()
}

pub fn get_decision(engine: &TwinEngine) -> Option<DecisionRecord> {
    get_latest_frame(engine).map(|frame| frame.decision)
}

pub fn get_metrics(engine: &TwinEngine) -> Option<MetricsRecord> {
    get_latest_frame(engine).map(|frame| frame.metrics)
}

// ============================================================================
// HISTORY COMMANDS
// ============================================================================

/// Power readings, oldest first
pub fn get_history(engine: &TwinEngine) -> Vec<f64> {
    engine.history().snapshot()
}

pub fn get_history_status(engine: &TwinEngine) -> HistoryStatus {
    engine.history().status()
}

// ============================================================================
// STATUS COMMANDS
// ============================================================================

pub fn get_feed_status(engine: &TwinEngine) -> FeedInfo {
    let status = engine.feed_status();
    FeedInfo {
        enabled: engine.feed().is_some(),
        status,
        label: status.as_str(),
        stats: engine.feed_stats(),
        last_received: engine
            .remote_state()
            .snapshot()
            .received_at
            .map(|t| t.to_rfc3339()),
    }
}

pub fn get_model_status(engine: &TwinEngine) -> ModelStatus {
    let metadata = engine.model_metadata().clone();
    ModelStatus {
        reduced_confidence: metadata.mode.is_reduced(),
        metadata,
    }
}

pub fn get_engine_status(engine: &TwinEngine) -> EngineStatus {
    EngineStatus {
        app_name: constants::APP_NAME,
        version: constants::APP_VERSION,
        ticks: engine.tick_count(),
        last_tick_time: get_latest_frame(engine).map(|frame| frame.timestamp.to_rfc3339()),
        history: get_history_status(engine),
        feed_status: engine.feed_status(),
        model: get_model_status(engine),
    }
}

// ============================================================================
// WAVEFORM COMMANDS
// ============================================================================

/// Trace for the last sample's voltage, flat before the first tick
pub fn get_waveform(engine: &TwinEngine, config: &TwinConfig) -> WaveformView {
    let amplitude = get_latest_frame(engine)
        .map(|frame| frame.sample.voltage)
        .unwrap_or(0.0);

    WaveformView {
        amplitude,
        frequency_hz: config.waveform.frequency_hz,
        points: metrics::synthesize(amplitude, &config.waveform),
    }
}
