//! botaniq HTTP server
//!
//! Exposes the species classifier and the plant health classifiers as JSON
//! endpoints for the mobile app.

pub mod error;
pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::{AppState, ServerConfig, SharedState};

/// Build the router with all routes, limits and middleware
///
/// POST routes answer both with and without their trailing slash.
pub fn build_router(state: SharedState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/", get(routes::root::index))
        .route("/health", get(routes::health::health_check))
        // Inference
        .route("/image-classify/", post(routes::classify::image_classify))
        .route("/image-classify", post(routes::classify::image_classify))
        .route("/health-detect/", post(routes::detect::health_detect))
        .route("/health-detect", post(routes::detect::health_detect))
        .route("/health-predict/", post(routes::detect::health_predict))
        .route("/health-predict", post(routes::detect::health_predict))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
