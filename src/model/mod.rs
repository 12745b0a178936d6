//! Model module: network architectures built with Burn
//!
//! - `cnn`: the image classifier that names a plant species from a photo
//! - `mlp`: the health classifier over standardized sensor features
//!
//! Both are inference-only here; weights are trained elsewhere and shipped as
//! compact burn records next to their JSON configs.

pub mod cnn;
pub mod mlp;

use std::path::Path;

use burn::config::Config;

use crate::utils::error::{BotaniqError, Result};

pub use cnn::{PlantClassifier, PlantClassifierConfig};
pub use mlp::{HealthClassifier, HealthClassifierConfig};

/// Default dropout rate used when building fresh models
pub const DEFAULT_DROPOUT: f64 = 0.3;

/// Load a burn model config from its JSON file
pub fn load_config<C: Config>(path: &Path) -> Result<C> {
    if !path.exists() {
        return Err(BotaniqError::PathNotFound(path.to_path_buf()));
    }
    C::load(path).map_err(|e| BotaniqError::Config(format!("{}: {:?}", path.display(), e)))
}
