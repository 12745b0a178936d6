//! Inference module: running the trained models on client inputs
//!
//! This module provides:
//! - Image payload decoding and preprocessing
//! - Species prediction from photos
//! - Learned health prediction from sensor readings

pub mod health;
pub mod decode;
pub mod predictor;

// Re-export main types for convenience
pub use decode::{decode_base64_image, preprocess};
pub use health::HealthPredictor;
pub use predictor::{ImageClassifier, PredictionResult};
