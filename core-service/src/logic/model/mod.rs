//! Model Module - Outlier Model Inference
//!
//! The statistical half of the anomaly decision, behind one trait so the
//! model can be swapped without touching the decision engine.
//!
//! ## Structure
//! - `inference.rs` - `OutlierModel` trait, labels, errors, always-inlier stub
//! - `onnx.rs` - ONNX Runtime model (persisted artifact)
//! - `envelope.rs` - Nominal z-score envelope (fallback / JSON artifact)
//! - `store.rs` - Artifact loading, checksum, fallback chain

pub mod envelope;
pub mod inference;
pub mod onnx;
pub mod store;

pub use envelope::NominalEnvelope;
pub use inference::{AlwaysInlier, ConfidenceMode, ModelError, ModelLabel, OutlierModel};
pub use onnx::OnnxOutlierModel;
pub use store::{load, verify_checksum, LoadedModel, ModelMetadata};
