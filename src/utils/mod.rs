//! Utilities module for logging and error handling

pub mod error;
pub mod logging;

// Re-export main types for convenience
pub use error::{BotaniqError, OptionExt, Result};
pub use logging::{init_logging, LogConfig, LogLevel};
