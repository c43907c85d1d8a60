//! Model Store
//!
//! Resolves which outlier model the engine runs with:
//! 1. Persisted artifact (`.onnx` / `.json`), checksum-verified if configured
//! 2. Nominal envelope trained in-process (reduced confidence)
//! 3. No model, thresholds only (reduced confidence)
//!
//! Loading never fails; every problem degrades to the next step.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::envelope::NominalEnvelope;
use super::inference::{AlwaysInlier, ConfidenceMode, ModelError, OutlierModel};
use super::onnx::OnnxOutlierModel;
use crate::logic::config::ModelConfig;

/// Model metadata for status reporting
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub model_name: String,
    pub source: String,
    pub mode: ConfidenceMode,
    pub loaded_at: DateTime<Utc>,
}

/// The model the engine runs with, plus how far it can be trusted
#[derive(Clone)]
pub struct LoadedModel {
    model: Arc<dyn OutlierModel>,
    metadata: ModelMetadata,
}

impl LoadedModel {
    pub fn new(model: Arc<dyn OutlierModel>, mode: ConfidenceMode, source: impl Into<String>) -> Self {
        let metadata = ModelMetadata {
            model_name: model.name().to_string(),
            source: source.into(),
            mode,
            loaded_at: Utc::now(),
        };
        Self { model, metadata }
    }

    /// Threshold-only mode
    pub fn unavailable() -> Self {
        Self::new(Arc::new(AlwaysInlier), ConfidenceMode::ThresholdOnly, "none")
    }

    pub fn model(&self) -> &dyn OutlierModel {
        self.model.as_ref()
    }

    pub fn mode(&self) -> ConfidenceMode {
        self.metadata.mode
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Resolve the model for this process
pub fn load(config: &ModelConfig) -> LoadedModel {
    if let Some(path) = config.path.as_deref() {
        match load_persisted(path, config) {
            Ok(model) => {
                log::info!("Outlier model loaded from {}", path.display());
                return LoadedModel::new(model, ConfidenceMode::Full, path.display().to_string());
            }
            Err(ModelError::NotFound(_)) => {
                log::info!("Model artifact {} not found", path.display());
            }
            Err(e) => {
                log::warn!("Model artifact {} unusable: {}", path.display(), e);
            }
        }
    }

    if config.train_fallback {
        match NominalEnvelope::train_synthetic(
            config.fallback_samples,
            config.contamination,
            config.fallback_seed,
        ) {
            Ok(envelope) => {
                log::warn!("Using fallback model trained on synthetic nominal data (reduced confidence)");
                return LoadedModel::new(Arc::new(envelope), ConfidenceMode::Fallback, "synthetic-nominal");
            }
            Err(e) => log::error!("Fallback model training failed: {}", e),
        }
    }

    log::warn!("No outlier model available - running on thresholds only (reduced confidence)");
    LoadedModel::unavailable()
}

fn load_persisted(path: &Path, config: &ModelConfig) -> Result<Arc<dyn OutlierModel>, ModelError> {
    if !path.exists() {
        return Err(ModelError::NotFound(path.to_path_buf()));
    }

    if let Some(expected) = config.expected_sha256.as_deref() {
        verify_checksum(path, expected)?;
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "onnx" => Ok(Arc::new(OnnxOutlierModel::load(
            path,
            config.onnx_label_output.as_deref(),
        )?)),
        "json" => Ok(Arc::new(NominalEnvelope::from_json_file(path)?)),
        other => Err(ModelError::UnsupportedFormat(other.to_string())),
    }
}

/// SHA-256 of the artifact must match (hex, case-insensitive)
pub fn verify_checksum(path: &Path, expected: &str) -> Result<(), ModelError> {
    let bytes = std::fs::read(path)?;
    let actual = hex::encode(Sha256::digest(&bytes));

    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(ModelError::ChecksumMismatch {
            expected: expected.to_string(),
            actual,
        })
    }
}
