//! Decision Types
//!
//! Core types for the anomaly verdict. No logic beyond score mapping.

use serde::{Deserialize, Serialize};

use super::rules::{
    ALERT_HEALTH_INDEX, ALERT_THEFT_PROBABILITY, SECURE_HEALTH_INDEX, SECURE_THEFT_PROBABILITY,
};
use crate::logic::model::{ConfidenceMode, ModelLabel};

// ============================================================================
// VERDICT
// ============================================================================

/// Final classification after rule overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Secure,
    Alert,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Secure => "SECURE",
            Verdict::Alert => "ALERT",
        }
    }

    pub fn theft_probability(&self) -> f64 {
        match self {
            Verdict::Secure => SECURE_THEFT_PROBABILITY,
            Verdict::Alert => ALERT_THEFT_PROBABILITY,
        }
    }

    pub fn health_index(&self) -> f64 {
        match self {
            Verdict::Secure => SECURE_HEALTH_INDEX,
            Verdict::Alert => ALERT_HEALTH_INDEX,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ANOMALY LABEL
// ============================================================================

/// Why a reading was classed anomalous
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalyLabel {
    None,
    VoltageDrop,
    Overload,
    PatternDeviation,
}

impl AnomalyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyLabel::None => "none",
            AnomalyLabel::VoltageDrop => "voltage_drop",
            AnomalyLabel::Overload => "overload",
            AnomalyLabel::PatternDeviation => "pattern_deviation",
        }
    }
}

// ============================================================================
// DECISION RECORD
// ============================================================================

/// Verdict for one sample.
///
/// Only constructible through `DecisionRecord::new`, which derives every
/// score from the verdict so `is_anomaly`, `theft_probability >= 0.5` and
/// `health_index <= 0.5` always agree. Fields are read through accessors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecisionRecord {
    is_anomaly: bool,
    theft_probability: f64,
    health_index: f64,
    anomaly_label: AnomalyLabel,
    verdict: Verdict,
    /// Raw model output (inlier when no model answered)
    model_label: ModelLabel,
    confidence_mode: ConfidenceMode,
}

impl DecisionRecord {
    pub fn new(
        verdict: Verdict,
        anomaly_label: AnomalyLabel,
        model_label: ModelLabel,
        confidence_mode: ConfidenceMode,
    ) -> Self {
        Self {
            is_anomaly: verdict == Verdict::Alert,
            theft_probability: verdict.theft_probability(),
            health_index: verdict.health_index(),
            anomaly_label,
            verdict,
            model_label,
            confidence_mode,
        }
    }

    pub fn secure(model_label: ModelLabel, confidence_mode: ConfidenceMode) -> Self {
        Self::new(Verdict::Secure, AnomalyLabel::None, model_label, confidence_mode)
    }

    pub fn alert(label: AnomalyLabel, model_label: ModelLabel, confidence_mode: ConfidenceMode) -> Self {
        Self::new(Verdict::Alert, label, model_label, confidence_mode)
    }

    pub fn is_anomaly(&self) -> bool {
        self.is_anomaly
    }

    pub fn theft_probability(&self) -> f64 {
        self.theft_probability
    }

    pub fn health_index(&self) -> f64 {
        self.health_index
    }

    pub fn anomaly_label(&self) -> AnomalyLabel {
        self.anomaly_label
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn model_label(&self) -> ModelLabel {
        self.model_label
    }

    pub fn confidence_mode(&self) -> ConfidenceMode {
        self.confidence_mode
    }
}
