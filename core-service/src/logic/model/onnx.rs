//! ONNX Outlier Model
//!
//! Runs an exported outlier classifier (e.g. an isolation forest) through
//! ONNX Runtime. Input is a `float[1, 2]` tensor `[voltage, current]`; the
//! label output holds `1` (inlier) or `-1` (outlier), as int64 or float.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::inference::{ModelError, ModelLabel, OutlierModel};
use crate::logic::telemetry::{FeatureVector, FEATURE_COUNT};

pub struct OnnxOutlierModel {
    session: Mutex<Session>,
    label_output: String,
}

impl OnnxOutlierModel {
    /// Load from file. `label_output` selects the label tensor; the first
    /// output is used when unset.
    pub fn load(model_path: &Path, label_output: Option<&str>) -> Result<Self, ModelError> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(ModelError::NotFound(model_path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e| ModelError::Runtime(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelError::Runtime(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| ModelError::Runtime(format!("Failed to load model: {}", e)))?;

        let label_output = match label_output {
            Some(name) => name.to_string(),
            None => session
                .outputs
                .first()
                .map(|o| o.name.clone())
                .ok_or_else(|| ModelError::Runtime("No output defined".to_string()))?,
        };

        log::info!("ONNX model loaded successfully (label output: {})", label_output);

        Ok(Self {
            session: Mutex::new(session),
            label_output,
        })
    }
}

impl OutlierModel for OnnxOutlierModel {
    fn predict(&self, features: &FeatureVector) -> Result<ModelLabel, ModelError> {
        let input: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), input)
            .map_err(|e| ModelError::Runtime(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| ModelError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| ModelError::Runtime(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.label_output)
            .ok_or_else(|| ModelError::Runtime(format!("No output '{}'", self.label_output)))?;

        let raw = if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
            data.first().copied()
        } else {
            let (_, data) = output
                .try_extract_tensor::<f32>()
                .map_err(|e| ModelError::Runtime(format!("Extract error: {}", e)))?;
            data.first().map(|v| v.round() as i64)
        };

        let raw = raw.ok_or_else(|| ModelError::Runtime("Empty label tensor".to_string()))?;
        ModelLabel::from_raw(raw)
    }

    fn name(&self) -> &str {
        "onnx"
    }
}
