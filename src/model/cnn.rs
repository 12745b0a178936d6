//! CNN Model Architecture for Plant Species Classification
//!
//! A small convolutional network that maps a square BGR photo to one of the
//! species classes listed in the model's label file.

use burn::{
    config::Config,
    module::Module,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig},
        BatchNorm, BatchNormConfig, Dropout, DropoutConfig, Linear, LinearConfig, PaddingConfig2d,
        Relu,
    },
    tensor::{activation::softmax, backend::Backend, Tensor},
};

use super::DEFAULT_DROPOUT;

/// Configuration for the PlantClassifier CNN model
#[derive(Config, Debug)]
pub struct PlantClassifierConfig {
    /// Number of output classes
    pub num_classes: usize,

    /// Side length photos are resized to before the forward pass
    #[config(default = "crate::IMAGE_SIZE")]
    pub input_size: usize,

    #[config(default = "DEFAULT_DROPOUT")]
    pub dropout_rate: f64,

    /// Number of input channels (3 for BGR)
    #[config(default = "3")]
    pub in_channels: usize,

    /// Filters in the first stage; each later stage doubles them
    #[config(default = "32")]
    pub base_filters: usize,

    /// Number of conv stages, each halving the resolution
    #[config(default = "4")]
    pub stages: usize,

    #[config(default = "256")]
    pub hidden_units: usize,
}

impl PlantClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> PlantClassifier<B> {
        PlantClassifier::new(self, device)
    }

    /// Filter count coming out of the last stage
    pub fn feature_channels(&self) -> usize {
        self.base_filters << self.stages.saturating_sub(1)
    }
}

/// 3x3 convolution, batch norm, ReLU, then a 2x2 max pool
#[derive(Module, Debug)]
pub struct ConvStage<B: Backend> {
    conv: Conv2d<B>,
    norm: BatchNorm<B, 2>,
    pool: MaxPool2d,
}

impl<B: Backend> ConvStage<B> {
    fn new(in_channels: usize, out_channels: usize, device: &B::Device) -> Self {
        Self {
            conv: Conv2dConfig::new([in_channels, out_channels], [3, 3])
                .with_padding(PaddingConfig2d::Same)
                .init(device),
            norm: BatchNormConfig::new(out_channels).init(device),
            pool: MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
        }
    }

    fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.norm.forward(self.conv.forward(x));
        self.pool.forward(Relu::new().forward(x))
    }
}

/// Plant species classifier
///
/// Conv stages feed a global average pool and a two-layer head. The pool makes
/// the network itself size-agnostic; `input_size` records the resolution the
/// weights were trained at so callers resize to match.
#[derive(Module, Debug)]
pub struct PlantClassifier<B: Backend> {
    stages: Vec<ConvStage<B>>,
    global_pool: AdaptiveAvgPool2d,
    hidden: Linear<B>,
    dropout: Dropout,
    output: Linear<B>,
    num_classes: usize,
    input_size: usize,
}

impl<B: Backend> PlantClassifier<B> {
    pub fn new(config: &PlantClassifierConfig, device: &B::Device) -> Self {
        let mut stages = Vec::with_capacity(config.stages);
        let mut channels = config.in_channels;
        for stage in 0..config.stages {
            let out = config.base_filters << stage;
            stages.push(ConvStage::new(channels, out, device));
            channels = out;
        }

        Self {
            stages,
            global_pool: AdaptiveAvgPool2dConfig::new([1, 1]).init(),
            hidden: LinearConfig::new(channels, config.hidden_units).init(device),
            dropout: DropoutConfig::new(config.dropout_rate).init(),
            output: LinearConfig::new(config.hidden_units, config.num_classes).init(device),
            num_classes: config.num_classes,
            input_size: config.input_size,
        }
    }

    /// Logits of shape `[batch, num_classes]` for a `[batch, 3, h, w]` input
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.stages.iter().fold(x, |x, stage| stage.forward(x));

        let x = self.global_pool.forward(x);
        let [batch_size, channels, _, _] = x.dims();
        let x = x.reshape([batch_size, channels]);

        let x = Relu::new().forward(self.hidden.forward(x));
        self.output.forward(self.dropout.forward(x))
    }

    pub fn forward_softmax(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        softmax(self.forward(x), 1)
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Resolution the model expects its inputs resized to
    pub fn input_size(&self) -> usize {
        self.input_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_plant_classifier_output_shape() {
        let device = Default::default();
        let config = PlantClassifierConfig::new(5);
        let model: PlantClassifier<TestBackend> = config.init(&device);

        let input = Tensor::<TestBackend, 4>::zeros([2, 3, 128, 128], &device);
        let output = model.forward(input);

        assert_eq!(output.dims(), [2, 5]);
        assert_eq!(model.num_classes(), 5);
    }

    #[test]
    fn test_softmax_rows_sum_to_one() {
        let device = Default::default();
        let model: PlantClassifier<TestBackend> =
            PlantClassifierConfig::new(4).with_base_filters(8).init(&device);

        let input = Tensor::<TestBackend, 4>::ones([1, 3, 64, 64], &device);
        let probs: Vec<f32> = model.forward_softmax(input).into_data().to_vec().unwrap();

        assert_eq!(probs.len(), 4);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_config_defaults() {
        let config = PlantClassifierConfig::new(47);
        assert_eq!(config.input_size, 128);
        assert_eq!(config.in_channels, 3);
        assert_eq!(config.base_filters, 32);
        assert_eq!(config.input_size, crate::IMAGE_SIZE);
        assert_eq!(config.feature_channels(), 256);
    }

    #[test]
    fn test_stage_count_and_input_size() {
        let device = Default::default();
        let config = PlantClassifierConfig::new(3)
            .with_input_size(32)
            .with_base_filters(4)
            .with_stages(2);
        assert_eq!(config.feature_channels(), 8);

        let model: PlantClassifier<TestBackend> = config.init(&device);
        assert_eq!(model.input_size(), 32);

        let input = Tensor::<TestBackend, 4>::zeros([1, 3, 32, 32], &device);
        assert_eq!(model.forward(input).dims(), [1, 3]);
    }
}
