//! API error type: every failure leaves the server as `{"detail": "..."}`.

use axum::{
    body::Bytes,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use botaniq::BotaniqError;

#[derive(Debug)]
pub enum ApiError {
    /// Malformed body, missing field, bad value or undecodable image
    BadRequest(String),
    /// Body larger than the configured limit
    PayloadTooLarge(String),
    /// The model a route needs was not loaded at startup
    ModelUnavailable(&'static str),
    /// Inference or runtime failure
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            ApiError::ModelUnavailable(model) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("{} model is not loaded", model),
            ),
            ApiError::Internal(msg) => {
                error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}

impl From<BotaniqError> for ApiError {
    fn from(err: BotaniqError) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        let message = rejection.body_text();
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(message)
        } else {
            ApiError::BadRequest(message)
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("inference task failed: {}", err))
    }
}

/// Parse a buffered body as JSON regardless of its Content-Type
///
/// Takes the extractor result so buffering failures, such as exceeding the
/// body limit, surface as `ApiError` too.
pub fn parse_json<T: serde::de::DeserializeOwned>(
    body: Result<Bytes, BytesRejection>,
) -> Result<T, ApiError> {
    let body = body?;
    serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))
}
