//! Feature standardization for the health classifier.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::error::{BotaniqError, Result};

/// Per-feature standardization: `(x - mean) / scale`
///
/// The statistics are computed at training time and shipped next to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        if mean.len() != scale.len() {
            return Err(BotaniqError::Config(format!(
                "scaler mean has {} features but scale has {}",
                mean.len(),
                scale.len()
            )));
        }
        Ok(Self { mean, scale })
    }

    /// A scaler that passes features through unchanged
    pub fn identity(num_features: usize) -> Self {
        Self {
            mean: vec![0.0; num_features],
            scale: vec![1.0; num_features],
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BotaniqError::PathNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let raw: StandardScaler = serde_json::from_str(&content)?;
        Self::new(raw.mean, raw.scale)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn num_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardize one sample
    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.num_features() {
            return Err(BotaniqError::InvalidInput(format!(
                "expected {} features, got {}",
                self.num_features(),
                features.len()
            )));
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                // Constant features were fitted with zero variance
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}
