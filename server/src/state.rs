//! Application state for the botaniq server
//!
//! Holds the server configuration and whichever models could be loaded at
//! startup.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use botaniq::backend::{default_device, InferenceBackend};
use botaniq::{HealthPredictor, ImageClassifier, ModelDir};

/// Server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Directory containing model records, configs and encoders
    pub models_dir: PathBuf,
    /// Largest accepted request body, in bytes (base64 photos are large)
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            models_dir: PathBuf::from("models"),
            max_body_bytes: 20 * 1024 * 1024,
        }
    }
}

/// Shared application state
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// Species classifier, if its artifacts were found
    pub image_classifier: Option<ImageClassifier<InferenceBackend>>,
    /// Learned health model, if its artifacts were found
    pub health_predictor: Option<HealthPredictor<InferenceBackend>>,
    /// Server start time
    pub started_at: Instant,
}

impl AppState {
    /// State with no models loaded
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            image_classifier: None,
            health_predictor: None,
            started_at: Instant::now(),
        }
    }

    /// Load every model present in the configured models directory
    ///
    /// Missing or broken artifacts are logged and leave that model unloaded;
    /// the routes depending on it answer 503.
    pub fn load(config: ServerConfig) -> Self {
        let dir = ModelDir::new(&config.models_dir);
        let device = default_device();
        let mut state = Self::new(config);

        if dir.has_image_model() {
            match ImageClassifier::load(&dir, &device) {
                Ok(classifier) => state.image_classifier = Some(classifier),
                Err(e) => warn!("Image classifier not loaded: {}", e),
            }
        } else {
            warn!("No image classifier artifacts in {:?}", dir.root());
        }

        if dir.has_health_model() {
            match HealthPredictor::load(&dir, &device) {
                Ok(predictor) => state.health_predictor = Some(predictor),
                Err(e) => warn!("Health model not loaded: {}", e),
            }
        } else {
            info!("No health model artifacts in {:?}; /health-predict/ disabled", dir.root());
        }

        state
    }

    pub fn with_image_classifier(mut self, classifier: ImageClassifier<InferenceBackend>) -> Self {
        self.image_classifier = Some(classifier);
        self
    }

    pub fn with_health_predictor(mut self, predictor: HealthPredictor<InferenceBackend>) -> Self {
        self.health_predictor = Some(predictor);
        self
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.models_dir, PathBuf::from("models"));
    }

    #[test]
    fn test_load_without_artifacts() {
        let config = ServerConfig {
            models_dir: PathBuf::from("/nonexistent/botaniq-models"),
            ..ServerConfig::default()
        };
        let state = AppState::load(config);
        assert!(state.image_classifier.is_none());
        assert!(state.health_predictor.is_none());
    }
}
