//! Health classifier: a multilayer perceptron over the five sensor features
//! (soil moisture, ambient temperature, soil temperature, humidity, light).

use burn::{
    config::Config,
    module::Module,
    nn::{Dropout, DropoutConfig, Linear, LinearConfig, Relu},
    tensor::{backend::Backend, Tensor},
};

use super::DEFAULT_DROPOUT;

/// Number of sensor features the health model consumes
pub const NUM_SENSOR_FEATURES: usize = 5;

#[derive(Config, Debug)]
pub struct HealthClassifierConfig {
    /// Number of health classes
    pub num_classes: usize,

    #[config(default = "NUM_SENSOR_FEATURES")]
    pub num_features: usize,

    #[config(default = "64")]
    pub hidden1: usize,

    #[config(default = "32")]
    pub hidden2: usize,

    #[config(default = "DEFAULT_DROPOUT")]
    pub dropout_rate: f64,
}

impl HealthClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> HealthClassifier<B> {
        HealthClassifier {
            fc1: LinearConfig::new(self.num_features, self.hidden1).init(device),
            fc2: LinearConfig::new(self.hidden1, self.hidden2).init(device),
            dropout: DropoutConfig::new(self.dropout_rate).init(),
            head: LinearConfig::new(self.hidden2, self.num_classes).init(device),
            activation: Relu::new(),
            num_features: self.num_features,
        }
    }
}

/// Dense network: features -> hidden1 -> hidden2 -> classes
#[derive(Module, Debug)]
pub struct HealthClassifier<B: Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
    dropout: Dropout,
    head: Linear<B>,
    activation: Relu,
    num_features: usize,
}

impl<B: Backend> HealthClassifier<B> {
    /// Input of shape [batch_size, num_features], output logits [batch_size, num_classes]
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.activation.forward(self.fc1.forward(x));
        let x = self.dropout.forward(x);
        let x = self.activation.forward(self.fc2.forward(x));
        self.head.forward(x)
    }

    pub fn forward_softmax(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        burn::tensor::activation::softmax(self.forward(x), 1)
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }
}
