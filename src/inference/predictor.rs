//! Species Predictor
//!
//! Runs the image classifier on decoded photos and maps the winning class
//! index to a species name.

use std::sync::Mutex;

use burn::{
    module::Module,
    record::CompactRecorder,
    tensor::{backend::Backend, Tensor, TensorData},
};
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use super::decode::{decode_base64_image, preprocess};
use crate::artifacts::{LabelEncoder, ModelDir};
use crate::model::{load_config, PlantClassifier, PlantClassifierConfig};
use crate::utils::error::{BotaniqError, Result};
use crate::utils::logging::InferenceTimer;

/// Number of ranked classes kept in a prediction
const TOP_K: usize = 5;

/// Result of a single prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted class index
    pub predicted_class: usize,

    /// Predicted class name
    pub class_name: String,

    /// Probability of the predicted class
    pub confidence: f32,

    /// Full probability distribution over all classes
    pub probabilities: Vec<f32>,

    /// Highest-probability classes, best first
    pub top_k: Vec<(usize, String, f32)>,

    /// Inference time in milliseconds
    pub inference_time_ms: f64,
}

impl PredictionResult {
    /// Build a result from a probability vector (argmax wins)
    pub fn from_probabilities(
        probabilities: Vec<f32>,
        labels: &LabelEncoder,
        inference_time_ms: f64,
    ) -> Result<Self> {
        let mut ranked: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
        // Stable sort keeps the lower index first on equal probability
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let &(predicted_class, confidence) = ranked.first().ok_or_else(|| {
            BotaniqError::Inference("model produced no probabilities".to_string())
        })?;

        let top_k = ranked
            .iter()
            .take(TOP_K)
            .map(|&(idx, prob)| Ok((idx, labels.inverse_transform(idx)?.to_string(), prob)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            predicted_class,
            class_name: labels.inverse_transform(predicted_class)?.to_string(),
            confidence,
            probabilities,
            top_k,
            inference_time_ms,
        })
    }

    /// Pretty print the prediction result
    pub fn display(&self) -> String {
        let mut output = format!(
            "Prediction: {} (class {})\nConfidence: {:.2}%\nInference time: {:.2} ms\n",
            self.class_name,
            self.predicted_class,
            self.confidence * 100.0,
            self.inference_time_ms
        );

        output.push_str(&format!("\nTop-{} predictions:\n", self.top_k.len()));
        for (i, (idx, name, prob)) in self.top_k.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} (class {}) - {:.2}%\n",
                i + 1,
                name,
                idx,
                prob * 100.0
            ));
        }

        output
    }
}

/// Image classifier: CNN plus the species label encoder
pub struct ImageClassifier<B: Backend> {
    // Burn modules are Send but not necessarily Sync
    model: Mutex<PlantClassifier<B>>,
    labels: LabelEncoder,
    input_size: usize,
    device: B::Device,
}

impl<B: Backend> ImageClassifier<B> {
    /// Load config, labels and weights from a model directory
    pub fn load(dir: &ModelDir, device: &B::Device) -> Result<Self> {
        let config: PlantClassifierConfig = load_config(&dir.image_config())?;
        let labels = LabelEncoder::load(&dir.image_labels())?;

        let model = PlantClassifier::<B>::new(&config, device)
            .load_file(dir.image_record(), &CompactRecorder::new(), device)
            .map_err(|e| BotaniqError::Model(format!("Failed to load image model: {:?}", e)))?;

        tracing::info!(
            "Loaded image classifier from {:?} ({} classes, {}x{} input)",
            dir.root(),
            labels.len(),
            model.input_size(),
            model.input_size()
        );

        Self::from_parts(model, labels, device.clone())
    }

    /// Assemble a classifier from an in-memory model
    ///
    /// Photos are resized to the model's own `input_size`.
    pub fn from_parts(
        model: PlantClassifier<B>,
        labels: LabelEncoder,
        device: B::Device,
    ) -> Result<Self> {
        if model.num_classes() != labels.len() {
            return Err(BotaniqError::Config(format!(
                "image model has {} outputs but {} labels",
                model.num_classes(),
                labels.len()
            )));
        }

        Ok(Self {
            input_size: model.input_size(),
            model: Mutex::new(model),
            labels,
            device,
        })
    }

    pub fn labels(&self) -> &LabelEncoder {
        &self.labels
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Classify a decoded image
    pub fn classify(&self, image: &DynamicImage) -> Result<PredictionResult> {
        let timer = InferenceTimer::start("image-classify");
        let size = self.input_size;

        let pixels = preprocess(image, size as u32);
        let input =
            Tensor::<B, 4>::from_data(TensorData::new(pixels, [1, 3, size, size]), &self.device);

        let probabilities: Vec<f32> = {
            let model = self
                .model
                .lock()
                .map_err(|_| BotaniqError::Inference("image model lock poisoned".to_string()))?;
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

    /// Decode a base64 payload and classify it
    pub fn classify_base64(&self, data: &str) -> Result<PredictionResult> {
        let image = decode_base64_image(data)?;
        self.classify(&image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::config::Config;
    use burn_ndarray::NdArray;
    use image::{Rgb, RgbImage};

    type TestBackend = NdArray;

    fn labels(names: &[&str]) -> LabelEncoder {
        LabelEncoder::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    fn small_classifier(names: &[&str]) -> ImageClassifier<TestBackend> {
        let device = Default::default();
        let model = PlantClassifierConfig::new(names.len())
            .with_input_size(32)
            .with_base_filters(4)
            .init(&device);
        ImageClassifier::from_parts(model, labels(names), device).unwrap()
    }

    #[test]
    fn test_prediction_result_from_probabilities() {
        let names = labels(&["a", "b", "c", "d", "e", "f"]);
        let result =
            PredictionResult::from_probabilities(vec![0.05, 0.6, 0.1, 0.0, 0.2, 0.05], &names, 3.0)
                .unwrap();

        assert_eq!(result.predicted_class, 1);
        assert_eq!(result.class_name, "b");
        assert_eq!(result.confidence, 0.6);
        assert_eq!(result.top_k.len(), TOP_K);
        assert_eq!(result.top_k[1].1, "e");
        assert!(result.display().contains("Prediction: b"));
    }

    #[test]
    fn test_prediction_tie_picks_lowest_index() {
        let names = labels(&["a", "b"]);
        let result = PredictionResult::from_probabilities(vec![0.5, 0.5], &names, 0.0).unwrap();
        assert_eq!(result.predicted_class, 0);
    }

    #[test]
    fn test_prediction_result_errors() {
        let names = labels(&["a"]);
        assert!(PredictionResult::from_probabilities(Vec::new(), &names, 0.0).is_err());
        // More outputs than labels
        assert!(PredictionResult::from_probabilities(vec![0.1, 0.9], &names, 0.0).is_err());
    }

    #[test]
    fn test_label_count_must_match_model() {
        let device = Default::default();
        let model = PlantClassifierConfig::new(3).with_base_filters(4).init(&device);
        let result = ImageClassifier::<TestBackend>::from_parts(model, labels(&["a", "b"]), device);
        assert!(matches!(result, Err(BotaniqError::Config(_))));
    }

    #[test]
    fn test_classify_returns_known_label() {
        let names = ["Aloe Vera", "Orchid", "Tulip"];
        let classifier = small_classifier(&names);
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 60, Rgb([30, 160, 40])));

        let result = classifier.classify(&image).unwrap();
        assert!(names.contains(&result.class_name.as_str()));
        assert_eq!(result.probabilities.len(), 3);
        let sum: f32 = result.probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_load_from_model_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ModelDir::new(tmp.path());
        let device = Default::default();

        let config = PlantClassifierConfig::new(2).with_input_size(32).with_base_filters(4);
        let model: PlantClassifier<TestBackend> = config.init(&device);
        model
            .save_file(dir.image_record(), &CompactRecorder::new())
            .unwrap();
        config.save(dir.image_config()).unwrap();
        labels(&["Calathea", "Yucca"]).save(&dir.image_labels()).unwrap();
        assert!(dir.has_image_model());

        let classifier = ImageClassifier::<TestBackend>::load(&dir, &device).unwrap();
        assert_eq!(classifier.input_size(), 32);
        assert_eq!(classifier.labels().len(), 2);

        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([200, 10, 10])));
        let result = classifier.classify(&image).unwrap();
        assert!(["Calathea", "Yucca"].contains(&result.class_name.as_str()));
    }

    #[test]
    fn test_load_missing_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ModelDir::new(tmp.path());
        let result = ImageClassifier::<TestBackend>::load(&dir, &Default::default());
        assert!(matches!(result, Err(BotaniqError::PathNotFound(_))));
    }
}
