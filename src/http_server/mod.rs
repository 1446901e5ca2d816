//! # HTTP Server Module
//!
//! Axum front end over the record stores.
//!
//! # Endpoints
//!
//! - `/teams`, `/matches`, `/reports` - CRUD, `/history` archive listing
//! - `/teams/country/:country`, `/reports/type/:type` - case-insensitive lookup
//! - `/`, `/hello/:name`, `/error`, `/health` - service endpoints

pub mod config;
pub mod entity_routes;
pub mod errors;
pub mod server;
pub mod service_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorDetail, ErrorResponse, ERROR_MESSAGE};
pub use server::HttpServer;
