//! Anomaly Decision Engine
//!
//! Input: Sample. Output: DecisionRecord.
//!
//! 1. Outlier model labels `[voltage, current]`
//! 2. Threshold rules may upgrade to ALERT, never downgrade
//! 3. Verdict maps to fixed scores
//!
//! Memoryless: every call evaluates the sample fresh.

use super::rules::DecisionThresholds;
use super::types::{AnomalyLabel, DecisionRecord};
use crate::logic::model::{ConfidenceMode, LoadedModel, ModelLabel};
use crate::logic::telemetry::Sample;

// ============================================================================
// MAIN DECISION FUNCTION
// ============================================================================

/// Fuse a model label with the threshold rules
pub fn decide(
    sample: &Sample,
    model_label: ModelLabel,
    confidence_mode: ConfidenceMode,
    thresholds: &DecisionThresholds,
) -> DecisionRecord {
    if let Some(label) = thresholds.forced_alert(sample) {
        return DecisionRecord::alert(label, model_label, confidence_mode);
    }

    match model_label {
        ModelLabel::Outlier => {
            DecisionRecord::alert(AnomalyLabel::PatternDeviation, model_label, confidence_mode)
        }
        ModelLabel::Inlier => DecisionRecord::secure(model_label, confidence_mode),
    }
}

/// Decision engine bound to a model and thresholds
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    model: LoadedModel,
    thresholds: DecisionThresholds,
}

impl DecisionEngine {
    pub fn new(model: LoadedModel, thresholds: DecisionThresholds) -> Self {
        Self { model, thresholds }
    }

    pub fn model(&self) -> &LoadedModel {
        &self.model
    }

    pub fn thresholds(&self) -> &DecisionThresholds {
        &self.thresholds
    }

    /// Evaluate one sample. A model error counts as `inlier` for this call
    /// and marks the decision threshold-only.
    pub fn evaluate(&self, sample: &Sample) -> DecisionRecord {
        let (model_label, mode) = match self.model.model().predict(&sample.features()) {
            Ok(label) => (label, self.model.mode()),
            Err(e) => {
                log::warn!("Outlier model failed ({}), deciding on thresholds only", e);
                (ModelLabel::Inlier, ConfidenceMode::ThresholdOnly)
            }
        };

        decide(sample, model_label, mode, &self.thresholds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::{ModelError, OutlierModel};
    use crate::logic::telemetry::FeatureVector;
    use crate::logic::threat::Verdict;
    use std::sync::Arc;

    struct AlwaysOutlier;

    impl OutlierModel for AlwaysOutlier {
        fn predict(&self, _: &FeatureVector) -> Result<ModelLabel, ModelError> {
            Ok(ModelLabel::Outlier)
        }

        fn name(&self) -> &str {
            "always-outlier"
        }
    }

    struct Broken;

    impl OutlierModel for Broken {
        fn predict(&self, _: &FeatureVector) -> Result<ModelLabel, ModelError> {
            Err(ModelError::Runtime("session poisoned".to_string()))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn engine_with(model: Arc<dyn OutlierModel>, mode: ConfidenceMode) -> DecisionEngine {
        DecisionEngine::new(LoadedModel::new(model, mode, "test"), DecisionThresholds::default())
    }

    fn sample_grid() -> Vec<Sample> {
        let mut grid = Vec::new();
        for v in [0.0, 10.0, 15.0, 150.0, 179.9, 180.0, 200.0, 230.0, 250.0, 250.1, 280.0, 300.0] {
            for c in [0.0, 0.2, 5.0, 20.0, 30.0, 35.0] {
                grid.push(Sample::new(v, c));
            }
        }
        grid
    }

    #[test]
    fn test_low_voltage_always_alerts() {
        let thresholds = DecisionThresholds::default();
        for v in [0.0, 10.0, 15.0, 179.99] {
            for label in [ModelLabel::Inlier, ModelLabel::Outlier] {
                let record = decide(&Sample::new(v, 0.0), label, ConfidenceMode::Full, &thresholds);
                assert!(record.is_anomaly());
                assert_eq!(record.anomaly_label(), AnomalyLabel::VoltageDrop);
            }
        }
    }

    #[test]
    fn test_high_voltage_always_alerts() {
        let thresholds = DecisionThresholds::default();
        for label in [ModelLabel::Inlier, ModelLabel::Outlier] {
            let record = decide(&Sample::new(265.0, 5.0), label, ConfidenceMode::Full, &thresholds);
            assert!(record.is_anomaly());
            assert_eq!(record.anomaly_label(), AnomalyLabel::PatternDeviation);
        }
    }

    #[test]
    fn test_model_decides_inside_band() {
        let thresholds = DecisionThresholds::default();
        let sample = Sample::new(230.0, 0.2);

        let secure = decide(&sample, ModelLabel::Inlier, ConfidenceMode::Full, &thresholds);
        assert_eq!(secure.verdict(), Verdict::Secure);
        assert_eq!(secure.anomaly_label(), AnomalyLabel::None);
        assert_eq!(secure.theft_probability(), 0.05);
        assert_eq!(secure.health_index(), 1.0);

        let alert = decide(&sample, ModelLabel::Outlier, ConfidenceMode::Full, &thresholds);
        assert_eq!(alert.verdict(), Verdict::Alert);
        assert_eq!(alert.anomaly_label(), AnomalyLabel::PatternDeviation);
        assert_eq!(alert.theft_probability(), 0.98);
        assert_eq!(alert.health_index(), 0.1);
    }

    #[test]
    fn test_scores_agree_with_verdict() {
        let inlier = engine_with(Arc::new(crate::logic::model::AlwaysInlier), ConfidenceMode::Full);
        let outlier = engine_with(Arc::new(AlwaysOutlier), ConfidenceMode::Full);

        for sample in sample_grid() {
            for engine in [&inlier, &outlier] {
                let record = engine.evaluate(&sample);
                assert_eq!(record.is_anomaly(), record.theft_probability() >= 0.5, "{:?}", sample);
                assert_eq!(record.is_anomaly(), record.health_index() <= 0.5, "{:?}", sample);
                assert_eq!(record.is_anomaly(), record.verdict() == Verdict::Alert);
                assert!((0.0..=1.0).contains(&record.theft_probability()));
                assert!((0.0..=1.0).contains(&record.health_index()));
                assert_eq!(record.is_anomaly(), record.anomaly_label() != AnomalyLabel::None);
            }
        }
    }

    #[test]
    fn test_rules_never_downgrade() {
        let outlier = engine_with(Arc::new(AlwaysOutlier), ConfidenceMode::Full);
        for sample in sample_grid() {
            assert!(outlier.evaluate(&sample).is_anomaly());
        }
    }

    #[test]
    fn test_model_error_is_threshold_only() {
        let engine = engine_with(Arc::new(Broken), ConfidenceMode::Full);

        let nominal = engine.evaluate(&Sample::new(230.0, 5.0));
        assert!(!nominal.is_anomaly());
        assert_eq!(nominal.confidence_mode(), ConfidenceMode::ThresholdOnly);

        let wire_cut = engine.evaluate(&Sample::new(10.0, 0.0));
        assert!(wire_cut.is_anomaly());
        assert_eq!(wire_cut.anomaly_label(), AnomalyLabel::VoltageDrop);
    }

    #[test]
    fn test_unavailable_model_mode_reported() {
        let engine = DecisionEngine::new(LoadedModel::unavailable(), DecisionThresholds::default());
        let record = engine.evaluate(&Sample::new(230.0, 0.2));

        assert!(!record.is_anomaly());
        assert_eq!(record.confidence_mode(), ConfidenceMode::ThresholdOnly);
    }
}
