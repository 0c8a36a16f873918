//! Model Module - Flood Classifier
//!
//! Tách logic inference khỏi feature assembly và reconciliation.
//! Dễ dàng swap model (ONNX hoặc fake trong tests).

pub mod classifier;
pub mod inference;

// Re-export common types
pub use classifier::{EngineStatus, FloodClassifier, InferenceError, Prediction};
pub use inference::{ModelManifest, OnnxFloodClassifier};
