//! HTTP server implementation using Axum.

use axum::{
    Router,
    routing::{get, put},
};
use std::future::Future;
use std::sync::Arc;
use todocast_core::config::BackendConfig;
use todocast_core::traits::{NotificationPublisher, TodoStore};
use tower_http::trace::TraceLayer;

use super::events::EventQueue;
use super::service::TodoService;

/// Shared state for the backend server.
pub struct AppState {
    pub service: TodoService,
}

impl AppState {
    pub fn new(service: TodoService) -> Self {
        Self { service }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/todos",
            get(super::routes::list_todos).post(super::routes::create_todo),
        )
        .route("/todos/{id}", put(super::routes::complete_todo))
        .route("/healthz", get(super::routes::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Serve the backend until `shutdown` resolves.
///
/// Change events are published by a background task started here. After
/// the server stops, events still queued get their publish attempt
/// before this returns.
pub async fn start(
    config: &BackendConfig,
    store: Arc<dyn TodoStore>,
    publisher: Arc<dyn NotificationPublisher>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let (events, publisher_task) = EventQueue::spawn(publisher);
    let service = TodoService::new(store, events, config.max_todo_length);
    let app = build_router(AppState::new(service));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Todo backend started on port {}", config.port);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    if let Err(e) = publisher_task.await {
        tracing::error!("Event publisher task failed: {e}");
    }
    served
}
