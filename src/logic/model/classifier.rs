//! Classifier seam
//!
//! Opaque scored function: feature vector in, categorical label out.
//! The classifier owns its feature schema.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::logic::features::{FeatureLayout, FeatureVector, LayoutMismatchError};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("model not loaded")]
    NotLoaded,
    #[error("model artifact error: {0}")]
    Artifact(String),
    #[error(transparent)]
    Schema(#[from] LayoutMismatchError),
    #[error("inference failed: {0}")]
    Runtime(String),
}

// ============================================================================
// OUTPUT
// ============================================================================

/// One prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    /// Probability of the flood class, when the model exposes one
    pub probability: Option<f32>,
}

/// Engine status for health reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model_name: String,
    pub inference_device: String,
    pub feature_count: usize,
    pub avg_latency_ms: f32,
    pub inference_count: u64,
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

pub trait FloodClassifier: Send + Sync {
    /// Ordered schema the model was trained against
    fn layout(&self) -> Arc<FeatureLayout>;

    fn is_ready(&self) -> bool;

    fn predict(&self, features: &FeatureVector) -> Result<String, InferenceError>;

    fn predict_probability(&self, _features: &FeatureVector) -> Result<Option<f32>, InferenceError> {
        Ok(None)
    }

    /// Label and probability in one call
    fn predict_full(&self, features: &FeatureVector) -> Result<Prediction, InferenceError> {
        let label = self.predict(features)?;
        let probability = self.predict_probability(features)?;
        Ok(Prediction { label, probability })
    }

    fn status(&self) -> EngineStatus {
        EngineStatus {
            model_loaded: self.is_ready(),
            model_name: "custom".to_string(),
            inference_device: "unknown".to_string(),
            feature_count: self.layout().len(),
            avg_latency_ms: 0.0,
            inference_count: 0,
        }
    }
}
