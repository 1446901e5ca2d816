//! # HTTP API Errors
//!
//! Every failure leaves the API as the same JSON body:
//! `{"message": "An error occurred", "detail": ..., "code": <status>}`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::schema::{ValidationError, Violation};
use crate::storage::StorageError;
use crate::store::StoreError;

/// Fixed top-level message of every error body
pub const ERROR_MESSAGE: &str = "An error occurred";

/// Result type for HTTP handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Record failed field validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Body or path could not be parsed
    #[error("Unprocessable request: {0}")]
    Unprocessable(String),

    /// Missing record or empty filter result
    #[error("{0}")]
    NotFound(String),

    /// Generic client error with no detail
    #[error("Bad request")]
    BadRequest,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Corrupt table or unreadable storage
    #[error("{0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(self) -> Option<ErrorDetail> {
        match self {
            ApiError::Validation(err) => Some(ErrorDetail::Violations(err.violations().to_vec())),
            ApiError::Unprocessable(text) | ApiError::NotFound(text) => {
                Some(ErrorDetail::Text(text))
            }
            ApiError::BadRequest => None,
            ApiError::Storage(err) => Some(ErrorDetail::Text(err.to_string())),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => ApiError::Validation(e),
            StoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            StoreError::Storage(e) => ApiError::Storage(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Unprocessable(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Unprocessable(rejection.body_text())
    }
}

/// `detail` field of the error body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Text(String),
    Violations(Vec<Violation>),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: &'static str,
    pub detail: Option<ErrorDetail>,
    pub code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let ApiError::Storage(err) = &self {
            tracing::error!(error = %err, "storage failure");
        }

        let body = ErrorResponse {
            message: ERROR_MESSAGE,
            detail: self.detail(),
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
