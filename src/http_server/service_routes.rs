//! Service HTTP Routes
//!
//! Welcome, greeting, error smoke-test and health check endpoints.

use axum::{extract::Path, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use super::entity_routes::MessageResponse;
use super::errors::ApiError;

pub const WELCOME_MESSAGE: &str = "Welcome to the Teams, Matches and Reports API";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Create service routes
pub fn service_routes() -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/hello/:name", get(hello_handler))
        .route("/error", get(error_handler))
        .route("/health", get(health_handler))
}

async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

async fn hello_handler(Path(name): Path<String>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("Hello {}", name),
    })
}

/// Always fails; exercises the error body
async fn error_handler() -> ApiError {
    ApiError::BadRequest
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}
