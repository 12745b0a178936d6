//! Species classification from a base64 photo

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{parse_json, ApiError};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct ImageClassifyRequest {
    /// Base64 encoded image, optionally as a data URL
    pub image: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImageClassifyResponse {
    pub name: String,
}

/// POST /image-classify/ - Name the plant species in a photo
pub async fn image_classify(
    State(state): State<SharedState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ImageClassifyResponse>, ApiError> {
    let request: ImageClassifyRequest = parse_json(body)?;

    if state.image_classifier.is_none() {
        return Err(ApiError::ModelUnavailable("image classifier"));
    }

    let result = tokio::task::spawn_blocking(move || {
        state
            .image_classifier
            .as_ref()
            .ok_or(ApiError::ModelUnavailable("image classifier"))?
            .classify_base64(&request.image)
            .map_err(ApiError::from)
    })
    .await??;

    info!(
        "image-classify: {} ({:.1}% in {:.1} ms)",
        result.class_name,
        result.confidence * 100.0,
        result.inference_time_ms
    );

    Ok(Json(ImageClassifyResponse {
        name: result.class_name,
    }))
}
