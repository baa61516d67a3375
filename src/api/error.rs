use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message returned for any malformed prediction request
pub const INVALID_INPUT_MESSAGE: &str =
    "Invalid input. Please ensure all fields are correctly formatted.";

/// API error types that can be returned from handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or not numeric. Carries no per-field detail.
    #[error("Invalid input. Please ensure all fields are correctly formatted.")]
    InvalidInput,

    #[error("Not found")]
    NotFound,
}

/// Error response that gets serialized to JSON
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "Client error");

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}
