//! Logic Module - Flood Risk Engine
//!
//! Chứa toàn bộ decision logic, không phụ thuộc HTTP layer.
//!
//! ## Structure
//! - `location/` - Coordinate, bounding box
//! - `features/` - Feature layout, vector, assembler
//! - `model/` - Flood classifier (ONNX)
//! - `risk/` - Threshold rules + reconciler
//! - `assessment/` - Orchestrator

// Core engine
pub mod location;
pub mod features;
pub mod model;
pub mod risk;
pub mod assessment;

// Signals
pub mod weather;
pub mod zones;
pub mod reports;

// Report side-effects
pub mod nlp;
pub mod geocoder;
pub mod alerts;

#[cfg(test)]
pub mod testing;
