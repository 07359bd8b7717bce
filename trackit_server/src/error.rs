use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use trackit_core::StoreError;

use crate::response::PrettyJson;

/// Wire-level error: store failures plus body validation
#[derive(Debug)]
pub enum ApiError {
    Store(StoreError),
    Validation(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Store(err) => write!(f, "{err}"),
            ApiError::Validation(msg) => write!(f, "invalid request body: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::InvalidKey(_)) | ApiError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Store(StoreError::Consistency(_)) | ApiError::Store(StoreError::Backend(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(%status, error = %message, "request failed");
        } else {
            tracing::debug!(%status, error = %message, "request rejected");
        }
        (status, PrettyJson(json!({ "error": message }))).into_response()
    }
}
