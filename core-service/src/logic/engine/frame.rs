//! Tick output record

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::logic::feed::FeedStatus;
use crate::logic::metrics::MetricsRecord;
use crate::logic::telemetry::{Sample, SourceMode};
use crate::logic::threat::DecisionRecord;

/// Everything one tick produced
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub tick: u64,
    pub timestamp: DateTime<Utc>,
    pub source: SourceMode,
    pub sample: Sample,
    pub metrics: MetricsRecord,
    pub decision: DecisionRecord,
    /// Power readings, oldest first
    pub history: Vec<f64>,
    pub feed_status: FeedStatus,
}
