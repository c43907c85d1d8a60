//! Decision Rules & Thresholds
//!
//! Hard physical limits layered on top of the outlier model, plus the
//! fixed scores each verdict maps to. Constants and config only.

use serde::{Deserialize, Serialize};

use super::types::AnomalyLabel;
use crate::logic::telemetry::Sample;

// ============================================================================
// THRESHOLDS
// ============================================================================

/// Below this voltage = forced alert (brownout / wire cut)
pub const LOW_VOLTAGE_THRESHOLD: f64 = 180.0;

/// Above this voltage = forced alert (overvoltage)
pub const HIGH_VOLTAGE_THRESHOLD: f64 = 250.0;

/// Above this current = forced alert (overload)
pub const OVERLOAD_CURRENT_THRESHOLD: f64 = 30.0;

// ============================================================================
// SCORES
// ============================================================================

pub const SECURE_THEFT_PROBABILITY: f64 = 0.05;
pub const SECURE_HEALTH_INDEX: f64 = 1.0;

pub const ALERT_THEFT_PROBABILITY: f64 = 0.98;
pub const ALERT_HEALTH_INDEX: f64 = 0.1;

// ============================================================================
// CONFIGURABLE THRESHOLDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionThresholds {
    pub low_voltage: f64,
    pub high_voltage: f64,
    /// `None` disables the overload rule
    pub overload_current: Option<f64>,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            low_voltage: LOW_VOLTAGE_THRESHOLD,
            high_voltage: HIGH_VOLTAGE_THRESHOLD,
            overload_current: Some(OVERLOAD_CURRENT_THRESHOLD),
        }
    }
}

impl DecisionThresholds {
    /// First rule that forces an alert for this sample, if any
    pub fn forced_alert(&self, sample: &Sample) -> Option<AnomalyLabel> {
        if sample.voltage < self.low_voltage {
            return Some(AnomalyLabel::VoltageDrop);
        }
        if sample.voltage > self.high_voltage {
            return Some(AnomalyLabel::PatternDeviation);
        }
        match self.overload_current {
            Some(limit) if sample.current > limit => Some(AnomalyLabel::Overload),
            _ => None,
        }
    }
}
