//! Nominal Envelope Model
//!
//! Per-feature z-score envelope. The outlier score of a point is its largest
//! absolute z-score; the decision threshold is the `1 - contamination`
//! quantile of the training scores, so roughly `contamination` of the
//! training set sits outside the envelope.
//!
//! Used as the in-process fallback (trained on synthetic nominal data) and
//! as a persisted `.json` artifact.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::inference::{ModelError, ModelLabel, OutlierModel};
use crate::constants::{NOMINAL_CURRENT, NOMINAL_VOLTAGE};
use crate::logic::telemetry::{FeatureVector, FEATURE_COUNT};

/// Floor for per-feature spread, keeps constant training columns usable
const MIN_STD: f64 = 1e-3;

/// Half-width of the synthetic voltage jitter (V)
const SYNTHETIC_VOLTAGE_JITTER: f64 = 3.0;

/// Half-width of the synthetic current jitter (A)
const SYNTHETIC_CURRENT_JITTER: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NominalEnvelope {
    pub mean: FeatureVector,
    pub std: FeatureVector,
    pub threshold: f64,
}

impl NominalEnvelope {
    /// Fit on a training set
    pub fn fit(data: &[FeatureVector], contamination: f64) -> Result<Self, ModelError> {
        if data.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }

        let n = data.len() as f64;
        let mut mean = [0.0; FEATURE_COUNT];
        let mut std = [0.0; FEATURE_COUNT];

        for i in 0..FEATURE_COUNT {
            mean[i] = data.iter().map(|row| row[i]).sum::<f64>() / n;
            let variance = data.iter().map(|row| (row[i] - mean[i]).powi(2)).sum::<f64>() / n;
            std[i] = variance.sqrt().max(MIN_STD);
        }

        let mut envelope = Self { mean, std, threshold: 0.0 };

        let mut scores: Vec<f64> = data.iter().map(|row| envelope.score(row)).collect();
        scores.sort_by(|a, b| a.total_cmp(b));
        envelope.threshold = quantile(&scores, 1.0 - contamination.clamp(0.0, 0.5));

        Ok(envelope)
    }

    /// Fit on `samples` synthetic nominal points around 230V / 5A
    pub fn train_synthetic(samples: usize, contamination: f64, seed: u64) -> Result<Self, ModelError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let data: Vec<FeatureVector> = (0..samples)
            .map(|_| {
                [
                    NOMINAL_VOLTAGE + rng.gen_range(-SYNTHETIC_VOLTAGE_JITTER..=SYNTHETIC_VOLTAGE_JITTER),
                    NOMINAL_CURRENT + rng.gen_range(-SYNTHETIC_CURRENT_JITTER..=SYNTHETIC_CURRENT_JITTER),
                ]
            })
            .collect();

        let envelope = Self::fit(&data, contamination)?;
        log::debug!(
            "Nominal envelope trained on {} points: mean={:?} std={:?} threshold={:.3}",
            samples,
            envelope.mean,
            envelope.std,
            envelope.threshold
        );
        Ok(envelope)
    }

    /// Largest absolute z-score
    pub fn score(&self, features: &FeatureVector) -> f64 {
        features
            .iter()
            .zip(self.mean.iter().zip(self.std.iter()))
            .map(|(x, (mean, std))| ((x - mean) / std).abs())
            .fold(0.0, f64::max)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path)?;
        let envelope: Self = serde_json::from_str(&content)?;
        Ok(envelope)
    }

    pub fn save_json(&self, path: &Path) -> Result<(), ModelError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl OutlierModel for NominalEnvelope {
    fn predict(&self, features: &FeatureVector) -> Result<ModelLabel, ModelError> {
        let score = self.score(features);
        if !score.is_finite() {
            return Err(ModelError::Runtime(format!("non-finite score for {:?}", features)));
        }

        Ok(if score > self.threshold {
            ModelLabel::Outlier
        } else {
            ModelLabel::Inlier
        })
    }

    fn name(&self) -> &str {
        "nominal-envelope"
    }
}

/// Nearest-rank quantile over sorted values
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let rank = (q * sorted.len() as f64).ceil() as usize;
    let index = rank.saturating_sub(1).min(sorted.len() - 1);
    sorted[index]
}
