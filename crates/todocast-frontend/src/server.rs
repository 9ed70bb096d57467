//! HTTP server implementation using Axum.

use axum::{
    Router,
    routing::{get, put},
};
use std::future::Future;
use std::sync::Arc;
use todocast_core::config::FrontendConfig;
use todocast_core::error::{Result, TodoCastError};
use tower_http::trace::TraceLayer;

/// Shared state for the frontend server.
pub struct FrontendState {
    pub config: FrontendConfig,
    /// Client for backend calls, bounded by `config.backend_timeout`.
    pub client: reqwest::Client,
}

impl FrontendState {
    pub fn new(config: FrontendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.backend_timeout)
            .build()
            .map_err(|e| TodoCastError::Config(format!("HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    pub fn backend(&self, path: &str) -> String {
        format!("{}{}", self.config.backend_url(), path)
    }
}

pub fn build_router(state: FrontendState) -> Router {
    Router::new()
        .route("/", get(super::routes::index_page))
        .route("/todos", get(super::routes::index_page))
        .route("/image.jpg", get(super::routes::image))
        .route(
            "/api/todos",
            get(super::routes::proxy_list).post(super::routes::proxy_create),
        )
        .route("/api/todos/{id}", put(super::routes::proxy_complete))
        .route("/healthz", get(super::routes::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Serve until `shutdown` resolves.
pub async fn start(
    config: FrontendConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let port = config.port;
    let app = build_router(FrontendState::new(config)?);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("Server started on port {port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
