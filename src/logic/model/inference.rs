//! Inference Engine - ONNX Runtime Integration
//!
//! Load và chạy flood classifier (RandomForest exported to ONNX).
//!
//! Artifacts (in `MODEL_DIR`):
//! - `model.onnx`: classifier graph, one float input `[1, n_features]`
//! - `model_features.json`: feature names (training order), optional
//!   StandardScaler params, optional class index → label map

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::classifier::{EngineStatus, FloodClassifier, InferenceError, Prediction};
use crate::logic::features::{FeatureLayout, FeatureVector};

pub const MODEL_FILE: &str = "model.onnx";
pub const MANIFEST_FILE: &str = "model_features.json";

/// Probability at or above which the flood class is chosen
const DECISION_THRESHOLD: f32 = 0.5;

// ============================================================================
// MANIFEST
// ============================================================================

/// StandardScaler parameters from training
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f32>,
    pub scale: Vec<f32>,
}

/// Sidecar describing the model's input schema and output labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelManifest {
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub scaler: Option<ScalerParams>,
    #[serde(default = "default_labels")]
    pub labels: BTreeMap<i64, String>,
}

fn default_labels() -> BTreeMap<i64, String> {
    BTreeMap::from([(0, "Low".to_string()), (1, "High".to_string())])
}

impl ModelManifest {
    pub fn from_json(content: &str) -> Result<Self, InferenceError> {
        let manifest: ModelManifest = serde_json::from_str(content)
            .map_err(|e| InferenceError::Artifact(format!("invalid {}: {}", MANIFEST_FILE, e)))?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<(), InferenceError> {
        if self.feature_names.is_empty() {
            return Err(InferenceError::Artifact("manifest declares no features".to_string()));
        }

        let layout = FeatureLayout::new(self.feature_names.iter().cloned());
        if let Some(name) = layout.duplicate() {
            return Err(InferenceError::Artifact(format!("duplicate feature '{}'", name)));
        }

        if let Some(scaler) = &self.scaler {
            let n = self.feature_names.len();
            if scaler.mean.len() != n || scaler.scale.len() != n {
                return Err(InferenceError::Artifact(format!(
                    "scaler has {}/{} params for {} features",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    n
                )));
            }
        }
        Ok(())
    }

    /// Apply the scaler (identity when absent). Zero scale is treated as 1.
    pub fn standardize(&self, values: &[f32]) -> Vec<f32> {
        match &self.scaler {
            Some(scaler) => values
                .iter()
                .zip(scaler.mean.iter().zip(scaler.scale.iter()))
                .map(|(v, (mean, scale))| {
                    let scale = if scale.abs() < f32::EPSILON { 1.0 } else { *scale };
                    (v - mean) / scale
                })
                .collect(),
            None => values.to_vec(),
        }
    }

    pub fn label_for(&self, class_index: i64) -> String {
        self.labels
            .get(&class_index)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// Pick the predicted class from raw outputs
pub fn select_class(class_index: Option<i64>, probability: Option<f32>) -> Option<i64> {
    class_index.or_else(|| probability.map(|p| i64::from(p >= DECISION_THRESHOLD)))
}

/// Flood-class probability from a probability tensor
pub fn positive_probability(data: &[f32]) -> Option<f32> {
    match data {
        [_, positive, ..] => Some(*positive),
        [single] => Some(*single),
        [] => None,
    }
}

// ============================================================================
// ONNX CLASSIFIER
// ============================================================================

pub struct OnnxFloodClassifier {
    session: Mutex<Session>,
    manifest: ModelManifest,
    layout: Arc<FeatureLayout>,
    model_path: String,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl OnnxFloodClassifier {
    /// Load `model.onnx` + `model_features.json` from `model_dir`
    pub fn load(model_dir: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let model_dir = model_dir.as_ref();
        let manifest_path = model_dir.join(MANIFEST_FILE);
        let model_path = model_dir.join(MODEL_FILE);

        tracing::info!("Loading flood classifier from: {}", model_dir.display());

        let content = std::fs::read_to_string(&manifest_path).map_err(|e| {
            InferenceError::Artifact(format!("{}: {}", manifest_path.display(), e))
        })?;
        let manifest = ModelManifest::from_json(&content)?;

        if !model_path.exists() {
            return Err(InferenceError::Artifact(format!(
                "Model not found: {}",
                model_path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError::Artifact(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Artifact(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(&model_path)
            .map_err(|e| InferenceError::Artifact(format!("Failed to load model: {}", e)))?;

        let layout = Arc::new(FeatureLayout::new(manifest.feature_names.iter().cloned()));

        tracing::info!(
            "Flood classifier loaded ({} features, layout hash {:08x})",
            layout.len(),
            layout.hash()
        );

        Ok(Self {
            session: Mutex::new(session),
            manifest,
            layout,
            model_path: model_path.display().to_string(),
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        })
    }

    fn run(&self, features: &FeatureVector) -> Result<Prediction, InferenceError> {
        let start_time = std::time::Instant::now();

        features.validate(&self.layout)?;
        let input = self.manifest.standardize(features.as_slice());

        let input_array = Array2::<f32>::from_shape_vec((1, input.len()), input)
            .map_err(|e| InferenceError::Runtime(format!("Array error: {}", e)))?;
        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();

        let outputs = session.run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(format!("Inference failed: {}", e)))?;

        // sklearn exports: int64 label tensor + float probability tensor
        let mut class_index = None;
        let mut probability = None;
        for name in &output_names {
            let Some(output) = outputs.get(name.as_str()) else { continue };

            if class_index.is_none() {
                if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
                    class_index = data.first().copied();
                    continue;
                }
            }
            if probability.is_none() {
                if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
                    probability = positive_probability(data);
                }
            }
        }

        let class = select_class(class_index, probability)
            .ok_or_else(|| InferenceError::Runtime("model produced no usable output".to_string()))?;

        let elapsed = start_time.elapsed().as_micros() as u64;
        self.latency_sum_us.fetch_add(elapsed, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        Ok(Prediction {
            label: self.manifest.label_for(class),
            probability,
        })
    }
}

impl FloodClassifier for OnnxFloodClassifier {
    fn layout(&self) -> Arc<FeatureLayout> {
        Arc::clone(&self.layout)
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn predict(&self, features: &FeatureVector) -> Result<String, InferenceError> {
        self.run(features).map(|p| p.label)
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<Option<f32>, InferenceError> {
        self.run(features).map(|p| p.probability)
    }

    fn predict_full(&self, features: &FeatureVector) -> Result<Prediction, InferenceError> {
        self.run(features)
    }

    fn status(&self) -> EngineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        EngineStatus {
            model_loaded: true,
            model_name: self.model_path.clone(),
            inference_device: "ONNX Runtime (CPU)".to_string(),
            feature_count: self.layout.len(),
            avg_latency_ms: avg,
            inference_count: count,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
