//! Outlier Model Contract
//!
//! The engine only needs one capability: `predict([voltage, current])`
//! returning inlier or outlier. Concrete models (ONNX artifact, nominal
//! envelope, always-inlier stub) live behind this trait.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::logic::telemetry::FeatureVector;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Binary model output. Raw encoding: `1` inlier, `-1` outlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelLabel {
    Inlier,
    Outlier,
}

impl ModelLabel {
    pub fn from_raw(raw: i64) -> Result<Self, ModelError> {
        match raw {
            1 => Ok(ModelLabel::Inlier),
            -1 => Ok(ModelLabel::Outlier),
            other => Err(ModelError::UnexpectedLabel(other)),
        }
    }

    pub fn as_raw(&self) -> i64 {
        match self {
            ModelLabel::Inlier => 1,
            ModelLabel::Outlier => -1,
        }
    }
}

/// How much the statistical half of a decision can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceMode {
    /// Persisted, trained model
    Full,
    /// In-process model trained on nominal data only
    Fallback,
    /// No usable model; thresholds only
    ThresholdOnly,
}

impl ConfidenceMode {
    pub fn is_reduced(&self) -> bool {
        !matches!(self, ConfidenceMode::Full)
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("inference runtime error: {0}")]
    Runtime(String),

    #[error("unexpected model label: {0}")]
    UnexpectedLabel(i64),

    #[error("training set is empty")]
    EmptyTrainingSet,
}

// ============================================================================
// MODEL TRAIT
// ============================================================================

/// Opaque outlier classifier over `[voltage, current]`
pub trait OutlierModel: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<ModelLabel, ModelError>;

    /// Short name for logs and status
    fn name(&self) -> &str;
}

/// Stand-in used when no model is available: everything is an inlier, so
/// only the deterministic thresholds can raise an alert.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysInlier;

impl OutlierModel for AlwaysInlier {
    fn predict(&self, _features: &FeatureVector) -> Result<ModelLabel, ModelError> {
        Ok(ModelLabel::Inlier)
    }

    fn name(&self) -> &str {
        "always-inlier"
    }
}
