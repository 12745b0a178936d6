//! Error Handling Module
//!
//! Defines the error type shared by the botaniq library, CLI and server.
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for botaniq operations
#[derive(Error, Debug)]
pub enum BotaniqError {
    /// Image bytes could not be decoded into pixels
    #[error("Image error: {0}")]
    Image(String),

    /// Base64 payload could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Error building or loading a model
    #[error("Model error: {0}")]
    Model(String),

    /// Error while running a forward pass
    #[error("Inference error: {0}")]
    Inference(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

impl BotaniqError {
    /// Whether the error was caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            BotaniqError::Image(_) | BotaniqError::Decode(_) | BotaniqError::InvalidInput(_)
        )
    }
}

impl From<serde_json::Error> for BotaniqError {
    fn from(err: serde_json::Error) -> Self {
        BotaniqError::Serialization(err.to_string())
    }
}

impl From<image::ImageError> for BotaniqError {
    fn from(err: image::ImageError) -> Self {
        BotaniqError::Image(err.to_string())
    }
}

impl From<base64::DecodeError> for BotaniqError {
    fn from(err: base64::DecodeError) -> Self {
        BotaniqError::Decode(err.to_string())
    }
}

/// Convenience Result type for botaniq operations
pub type Result<T> = std::result::Result<T, BotaniqError>;

/// Turn a missing optional input into an [`BotaniqError::InvalidInput`]
pub trait OptionExt<T> {
    fn context(self, msg: &str) -> Result<T>;

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| BotaniqError::InvalidInput(msg.to_string()))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.ok_or_else(|| BotaniqError::InvalidInput(f()))
    }
}
