//! Features Module - Feature Assembly Engine
//!
//! Tách logic build feature vector khỏi inference.
//! Layout lấy từ classifier, không hardcode ở assembler.

pub mod layout;
pub mod vector;
pub mod assembler;


// Re-export common types
pub use layout::{FeatureLayout, LayoutMismatchError};
pub use vector::FeatureVector;
pub use assembler::{
    AssembledFeatures, FeatureAssembler, RegionProfile, WeatherDefaults, DEFAULT_WEATHER_TIMEOUT,
};
