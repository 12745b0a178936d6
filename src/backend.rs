//! Backend Selection
//!
//! Inference backend chosen at compile time:
//! - CUDA when built with the `cuda` feature
//! - NdArray on CPU otherwise
//!
//! Only inference runs here, so no autodiff wrapper is applied.

use burn::tensor::backend::Backend;

#[cfg(feature = "cuda")]
pub type InferenceBackend = burn_cuda::Cuda;

#[cfg(not(feature = "cuda"))]
pub type InferenceBackend = burn_ndarray::NdArray;

/// Device type of the inference backend
pub type InferenceDevice = <InferenceBackend as Backend>::Device;

/// Get the default device for the current backend
pub fn default_device() -> InferenceDevice {
    InferenceDevice::default()
}

/// Get a human-readable name for the current backend
pub fn backend_name() -> &'static str {
    #[cfg(feature = "cuda")]
    {
        "CUDA (GPU)"
    }

    #[cfg(not(feature = "cuda"))]
    {
        "NdArray (CPU)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_available() {
        let _device = default_device();
        assert!(!backend_name().is_empty());
    }
}
