//! botaniq Server
//!
//! HTTP API serving plant species classification from photos and plant health
//! classification from sensor readings.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use botaniq::backend::backend_name;
use botaniq::utils::logging::{init_logging, LogConfig, LogLevel};
use botaniq_server::{build_router, AppState, ServerConfig};

/// botaniq inference server
#[derive(Parser, Debug)]
#[command(name = "botaniq-server")]
#[command(version)]
#[command(about = "HTTP API for plant species and plant health inference")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "BOTANIQ_PORT", default_value = "8000")]
    port: u16,

    /// Host to bind to
    #[arg(long, env = "BOTANIQ_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Directory holding model records, configs and encoders
    #[arg(long, env = "BOTANIQ_MODELS_DIR", default_value = "models")]
    models_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error); BOTANIQ_LOG directives take precedence
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Maximum request body size in megabytes
    #[arg(long, env = "BOTANIQ_MAX_BODY_MB", default_value = "20")]
    max_body_mb: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&LogConfig::production().with_level(LogLevel::from_name(&cli.log_level)))?;

    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
        models_dir: cli.models_dir,
        max_body_bytes: cli.max_body_mb * 1024 * 1024,
    };

    info!("botaniq server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Models dir: {:?}", config.models_dir);
    info!("  Backend:    {}", backend_name());
    info!("  Body limit: {} MB", cli.max_body_mb);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    // Model loading is CPU bound
    let state = tokio::task::spawn_blocking(move || AppState::load(config)).await?;
    let app = build_router(Arc::new(state));

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
