//! Logging Module
//!
//! Structured logging setup using the `tracing` crate, shared by the CLI and
//! the HTTP server.

use std::time::Instant;

use tracing_subscriber::{EnvFilter, FmtSubscriber};

use super::error::{BotaniqError, Result};

/// Environment variable holding filter directives, e.g. `botaniq=trace,tower_http=debug`
pub const LOG_ENV: &str = "BOTANIQ_LOG";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level to display
    pub level: LogLevel,
    /// Whether to include target (module path)
    pub include_target: bool,
    /// Whether to include thread IDs
    pub include_thread_ids: bool,
    /// Whether to use ANSI colors
    pub ansi_colors: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            include_target: false,
            include_thread_ids: false,
            ansi_colors: true,
        }
    }
}

impl LogConfig {
    /// Verbose logging for debugging
    pub fn verbose() -> Self {
        Self {
            level: LogLevel::Debug,
            include_target: true,
            include_thread_ids: true,
            ansi_colors: true,
        }
    }

    /// Production logging: no colors, for log collectors
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            include_target: false,
            include_thread_ids: false,
            ansi_colors: false,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Filter directives: a non-empty override wins over the configured level
    fn directives(&self, overrides: Option<String>) -> String {
        overrides
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| self.level.directive().to_string())
    }

    /// Filter from `BOTANIQ_LOG` if set, otherwise from `level`
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::new(self.directives(std::env::var(LOG_ENV).ok()))
    }
}

/// Log level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Lowercase name as used in filter directives
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parse a level name, falling back to `Info` for anything unrecognized
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Install the global tracing subscriber
///
/// `BOTANIQ_LOG` overrides the configured level when set. Fails if a global
/// subscriber has already been set.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(config.env_filter())
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .with_thread_ids(config.include_thread_ids)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| BotaniqError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// Times a single prediction and logs it on completion
pub struct InferenceTimer {
    operation: &'static str,
    start: Instant,
}

impl InferenceTimer {
    pub fn start(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }

    /// Elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Log the outcome and return the elapsed milliseconds
    pub fn finish(self, outcome: &str) -> f64 {
        let elapsed = self.elapsed_ms();
        tracing::debug!("{}: {} in {:.2} ms", self.operation, outcome, elapsed);
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_name() {
        assert_eq!(LogLevel::from_name("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::from_name("INFO"), LogLevel::Info);
        assert_eq!(LogLevel::from_name(" Warning "), LogLevel::Warn);
        assert_eq!(LogLevel::from_name("unknown"), LogLevel::Info);
    }

    #[test]
    fn test_log_config_presets() {
        assert_eq!(LogConfig::default().level, LogLevel::Info);
        assert_eq!(LogConfig::verbose().level, LogLevel::Debug);
        assert!(!LogConfig::production().ansi_colors);
        assert_eq!(
            LogConfig::production().with_level(LogLevel::Warn).level,
            LogLevel::Warn
        );
    }

    #[test]
    fn test_filter_directives() {
        let config = LogConfig::default().with_level(LogLevel::Warn);
        assert_eq!(config.directives(None), "warn");
        assert_eq!(config.directives(Some("  ".to_string())), "warn");
        assert_eq!(
            config.directives(Some("botaniq=trace".to_string())),
            "botaniq=trace"
        );
        assert_eq!(LogLevel::Trace.directive(), "trace");
    }

    #[test]
    fn test_inference_timer() {
        let timer = InferenceTimer::start("test");
        let elapsed = timer.finish("ok");
        assert!(elapsed >= 0.0);
    }
}
