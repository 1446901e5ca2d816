//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::io;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::config::HttpServerConfig;
use super::entity_routes::{entity_routes, filter_routes};
use super::service_routes::service_routes;
use crate::store::Database;

/// HTTP server for the tournament API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `database`
    pub fn new(config: HttpServerConfig, database: &Database) -> Self {
        let router = Self::build_router(&config, database);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, database: &Database) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            // Config validation rejects malformed origins before this point
            let origins = config.allowed_origins().unwrap_or_else(|reason| {
                tracing::warn!(%reason, "CORS origins rejected, allowing none");
                Vec::new()
            });

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(service_routes())
            .merge(entity_routes(database.teams.clone()))
            .merge(filter_routes(database.teams.clone()))
            .merge(entity_routes(database.matches.clone()))
            .merge(entity_routes(database.reports.clone()))
            .merge(filter_routes(database.reports.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "HTTP server listening");
        tracing::info!("health check: http://{}/health", addr);

        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
