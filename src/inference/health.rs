//! Learned Health Predictor
//!
//! Standardizes a five-feature sensor reading, runs the health MLP and maps
//! the winning class to its label. This is the trained counterpart of the
//! reference-vector classifier in [`crate::stress`].

use std::sync::Mutex;

use burn::{
    module::Module,
    record::CompactRecorder,
    tensor::{backend::Backend, Tensor, TensorData},
};

use super::predictor::PredictionResult;
use crate::artifacts::{LabelEncoder, ModelDir, StandardScaler};
use crate::model::{load_config, HealthClassifier, HealthClassifierConfig};
use crate::stress::SensorReading;
use crate::utils::error::{BotaniqError, OptionExt, Result};
use crate::utils::logging::InferenceTimer;

pub struct HealthPredictor<B: Backend> {
    model: Mutex<HealthClassifier<B>>,
    scaler: StandardScaler,
    labels: LabelEncoder,
    device: B::Device,
}

impl<B: Backend> HealthPredictor<B> {
    /// Load config, weights, scaler and labels from a model directory
    pub fn load(dir: &ModelDir, device: &B::Device) -> Result<Self> {
        let config: HealthClassifierConfig = load_config(&dir.health_config())?;
        let scaler = StandardScaler::load(&dir.health_scaler())?;
        let labels = LabelEncoder::load(&dir.health_labels())?;

        if labels.len() != config.num_classes {
            return Err(BotaniqError::Config(format!(
                "health model has {} outputs but {} labels",
                config.num_classes,
                labels.len()
            )));
        }

        let model = config
            .init::<B>(device)
            .load_file(dir.health_record(), &CompactRecorder::new(), device)
            .map_err(|e| BotaniqError::Model(format!("Failed to load health model: {:?}", e)))?;

        tracing::info!(
            "Loaded health classifier from {:?} ({} classes)",
            dir.root(),
            labels.len()
        );

        Self::from_parts(model, scaler, labels, device.clone())
    }

    pub fn from_parts(
        model: HealthClassifier<B>,
        scaler: StandardScaler,
        labels: LabelEncoder,
        device: B::Device,
    ) -> Result<Self> {
        if scaler.num_features() != model.num_features() {
            return Err(BotaniqError::Config(format!(
                "scaler has {} features but the health model expects {}",
                scaler.num_features(),
                model.num_features()
            )));
        }

        Ok(Self {
            model: Mutex::new(model),
            scaler,
            labels,
            device,
        })
    }

    pub fn labels(&self) -> &LabelEncoder {
        &self.labels
    }

    /// Predict the health label for one set of raw sensor values
    pub fn predict_health(
        &self,
        soil_moisture: f64,
        ambient_temp: f64,
        soil_temp: f64,
        humidity: f64,
        light_intensity: f64,
    ) -> Result<PredictionResult> {
        let timer = InferenceTimer::start("health-predict");

        let raw = [soil_moisture, ambient_temp, soil_temp, humidity, light_intensity];
        if raw.iter().any(|v| !v.is_finite()) {
            return Err(BotaniqError::InvalidInput(
                "sensor values must be finite numbers".to_string(),
            ));
        }

        let scaled: Vec<f32> = self
            .scaler
            .transform(&raw)?
            .into_iter()
            .map(|v| v as f32)
            .collect();
        let num_features = scaled.len();
        let input = Tensor::<B, 2>::from_data(TensorData::new(scaled, [1, num_features]), &self.device);

        let probabilities: Vec<f32> = {
            let model = self
                .model
                .lock()
                .map_err(|_| BotaniqError::Inference("health model lock poisoned".to_string()))?;
            model
                .forward_softmax(input)
                .into_data()
                .to_vec()
                .map_err(|e| BotaniqError::Inference(format!("{:?}", e)))?
        };

        let result =
            PredictionResult::from_probabilities(probabilities, &self.labels, timer.elapsed_ms())?;
        timer.finish(&result.class_name);
        Ok(result)
    }

    /// Predict from a reading; the learned model needs soil temperature
    pub fn predict_reading(&self, reading: &SensorReading) -> Result<PredictionResult> {
        let soil_temp = reading
            .soil_temp
            .context("soil temperature is required by the health model")?;

        self.predict_health(
            reading.soil_moisture,
            reading.ambient_temp,
            soil_temp,
            reading.humidity,
            reading.light_intensity,
        )
    }
}
