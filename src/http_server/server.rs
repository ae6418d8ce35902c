//! # HTTP Server
//!
//! Binds the key-value and health routes to one listener.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::config::HttpServerConfig;
use super::kv_routes::{kv_routes, KvState};
use super::observability_routes::health_routes;
use crate::engine::StorageEngine;

/// HTTP server in front of one storage engine
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server that serves `engine`
    pub fn new(config: HttpServerConfig, engine: Arc<dyn StorageEngine>) -> Self {
        let router = Self::build_router(&config, engine);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, engine: Arc<dyn StorageEngine>) -> Router {
        let state = Arc::new(KvState::new(engine));

        Router::new()
            .merge(health_routes(state.clone()))
            .merge(kv_routes(state))
            .layer(DefaultBodyLimit::max(config.max_value_bytes))
            .layer(TraceLayer::new_for_http())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        let addr: SocketAddr = listener.local_addr()?;
        tracing::info!("Starting server at {}", addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
