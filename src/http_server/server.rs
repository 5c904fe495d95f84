//! # HTTP Server
//!
//! Serves the document router behind a CORS layer.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::api::ApiHandler;
use crate::observability::Logger;

use super::config::HttpServerConfig;
use super::document_routes::document_routes;

/// HTTP front end for an [`ApiHandler`]
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server with default configuration
    pub fn new(handler: Arc<ApiHandler>) -> Self {
        Self::with_config(HttpServerConfig::default(), handler)
    }

    /// Create a server with custom configuration
    pub fn with_config(config: HttpServerConfig, handler: Arc<ApiHandler>) -> Self {
        let router = Self::build_router(&config, handler);
        Self { config, router }
    }

    fn build_router(config: &HttpServerConfig, handler: Arc<ApiHandler>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        document_routes(handler).layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until the process is stopped
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid listen address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        Logger::info("HTTP_SERVER_STARTED", &[("address", &addr.to_string())]);

        axum::serve(listener, self.router).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentEntry, DocumentRegistry};

    fn handler() -> Arc<ApiHandler> {
        let registry =
            DocumentRegistry::new([DocumentEntry::new("example", "example.json")]).unwrap();
        Arc::new(ApiHandler::new(Arc::new(registry)))
    }

    #[test]
    fn test_server_creation() {
        let server = HttpServer::new(handler());
        assert_eq!(server.socket_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_server_with_custom_port() {
        let config = HttpServerConfig::with_port(8080);
        let server = HttpServer::with_config(config, handler());
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds_with_cors_origins() {
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:3000".into()],
            ..HttpServerConfig::default()
        };
        let _router = HttpServer::with_config(config, handler()).router();
    }
}
