//! Health check endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::SharedState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub backend: String,
    pub image_model_loaded: bool,
    pub health_model_loaded: bool,
}

/// GET /health - Health check endpoint
pub async fn health_check(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: botaniq::backend::backend_name().to_string(),
        image_model_loaded: state.image_classifier.is_some(),
        health_model_loaded: state.health_predictor.is_some(),
    })
}
