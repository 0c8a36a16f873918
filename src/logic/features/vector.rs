//! Feature Vector - Core data structure for classifier input
//!
//! **Schema-bound feature vector with layout validation**
//!
//! A vector is always complete for the layout it was built from: every
//! name has a value (0.0 until set). The classifier never sees a partial
//! vector.

use std::sync::Arc;

use serde::Serialize;

use super::layout::{FeatureLayout, LayoutMismatchError};

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Values in the order defined by the layout
#[derive(Debug, Clone, Serialize)]
pub struct FeatureVector {
    #[serde(skip)]
    layout: Arc<FeatureLayout>,
    /// CRC32 hash of the layout (for mismatch detection)
    pub layout_hash: u32,
    pub values: Vec<f32>,
}

impl FeatureVector {
    /// Zeroed vector for `layout`
    pub fn new(layout: Arc<FeatureLayout>) -> Self {
        let values = vec![0.0; layout.len()];
        Self {
            layout_hash: layout.hash(),
            layout,
            values,
        }
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<f32> {
        self.layout.index_of(name).and_then(|i| self.get(i))
    }

    pub fn set(&mut self, index: usize, value: f32) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    /// Returns false if the layout has no such feature
    pub fn set_by_name(&mut self, name: &str, value: f32) -> bool {
        if let Some(index) = self.layout.index_of(name) {
            self.set(index, value);
            true
        } else {
            false
        }
    }

    /// (name, value) pairs in layout order
    pub fn named_values(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.layout
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Check compatibility against the classifier's expected layout
    pub fn validate(&self, expected: &FeatureLayout) -> Result<(), LayoutMismatchError> {
        if self.layout_hash != expected.hash() || self.values.len() != expected.len() {
            return Err(LayoutMismatchError {
                expected_hash: expected.hash(),
                expected_len: expected.len(),
                actual_hash: self.layout_hash,
                actual_len: self.values.len(),
            });
        }
        Ok(())
    }

    /// JSON-serializable view for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "layout_hash": self.layout_hash,
            "values": self.values,
            "named_values": self.named_values()
                .map(|(name, value)| (name.to_string(), value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
