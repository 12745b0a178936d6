//! # botaniq
//!
//! Plant species and plant health inference for the botaniq mobile app.
//!
//! ## Features
//!
//! - **Species classification** from photos with a small Burn CNN
//! - **Stress detection** from sensor readings by nearest reference vector,
//!   per species group (ferns, succulents, palms, ornamental)
//! - **Learned health prediction** with a Burn MLP over standardized readings
//!
//! ## Modules
//!
//! - `species`: the supported species and their groups
//! - `stress`: reference vectors and the nearest-centroid stress classifier
//! - `artifacts`: label encoders, scalers and the model directory layout
//! - `model`: network architectures
//! - `inference`: image decoding and model predictors
//! - `utils`: errors and logging
//!
//! ## Quick Start
//!
//! ```rust
//! use botaniq::stress::{plant_status, SensorReading};
//!
//! let reading = SensorReading::new(19.0, 22.0, 61.0, 270.0);
//! assert_eq!(plant_status("Peace Lily", &reading), "High Stress");
//! ```

pub mod artifacts;
pub mod backend;
pub mod inference;
pub mod model;
pub mod species;
pub mod stress;
pub mod utils;

// Re-export commonly used items for convenience
pub use artifacts::{LabelEncoder, ModelDir, StandardScaler};
pub use inference::{HealthPredictor, ImageClassifier, PredictionResult};
pub use species::{SpeciesGroup, SpeciesRef, SPECIES};
pub use stress::{
    classify_reading, get_plant_stress_condition, plant_status, Condition, SensorReading,
};
pub use utils::error::{BotaniqError, Result};

/// Default input size of the species classifier
pub const IMAGE_SIZE: usize = 128;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
