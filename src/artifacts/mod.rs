//! Model Artifacts
//!
//! Everything a trained model needs besides its weights:
//! - `labels`: class index to class name mapping
//! - `scaler`: feature standardization for the health model
//!
//! [`ModelDir`] fixes the file layout of a model directory so the CLI and the
//! server look for the same files.

pub mod labels;
pub mod scaler;

use std::path::{Path, PathBuf};

pub use labels::LabelEncoder;
pub use scaler::StandardScaler;

/// File stem of the image classifier record and config
pub const IMAGE_MODEL_STEM: &str = "image_classifier";
/// Class names for the image classifier
pub const IMAGE_LABELS_FILE: &str = "image_labels.json";
/// File stem of the health classifier record and config
pub const HEALTH_MODEL_STEM: &str = "health_model";
/// Class names for the health classifier
pub const HEALTH_LABELS_FILE: &str = "health_labels.json";
/// Scaler statistics for the health classifier
pub const HEALTH_SCALER_FILE: &str = "health_scaler.json";

/// Extension the compact burn recorder writes
const RECORD_EXTENSION: &str = "mpk";

/// A directory holding model records, configs and encoders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDir {
    root: PathBuf,
}

impl ModelDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Record path without extension, as burn's file recorders expect it
    pub fn image_record(&self) -> PathBuf {
        self.root.join(IMAGE_MODEL_STEM)
    }

    pub fn image_config(&self) -> PathBuf {
        self.root.join(format!("{}.json", IMAGE_MODEL_STEM))
    }

    pub fn image_labels(&self) -> PathBuf {
        self.root.join(IMAGE_LABELS_FILE)
    }

    /// Record path without extension, as burn's file recorders expect it
    pub fn health_record(&self) -> PathBuf {
        self.root.join(HEALTH_MODEL_STEM)
    }

    pub fn health_config(&self) -> PathBuf {
        self.root.join(format!("{}.json", HEALTH_MODEL_STEM))
    }

    pub fn health_labels(&self) -> PathBuf {
        self.root.join(HEALTH_LABELS_FILE)
    }

    pub fn health_scaler(&self) -> PathBuf {
        self.root.join(HEALTH_SCALER_FILE)
    }

    /// Whether every file the image classifier needs is present
    pub fn has_image_model(&self) -> bool {
        self.image_record().with_extension(RECORD_EXTENSION).is_file()
            && self.image_config().is_file()
            && self.image_labels().is_file()
    }

    /// Whether every file the health classifier needs is present
    pub fn has_health_model(&self) -> bool {
        self.health_record().with_extension(RECORD_EXTENSION).is_file()
            && self.health_config().is_file()
            && self.health_labels().is_file()
            && self.health_scaler().is_file()
    }
}
