//! HTTP handlers for the todo backend.

use axum::{
    Json,
    extract::{Path, State, rejection::StringRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use todocast_core::error::TodoCastError;
use todocast_core::types::TodoItem;

use super::server::AppState;

/// Error as seen by an HTTP caller.
pub struct ApiError(pub TodoCastError);

impl From<TodoCastError> for ApiError {
    fn from(e: TodoCastError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        } else {
            tracing::info!("Request rejected: {}", self.0);
        }
        (status, Json(serde_json::json!({"error": self.0.to_string()}))).into_response()
    }
}

/// `GET /todos`
pub async fn list_todos(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TodoItem>>, ApiError> {
    Ok(Json(state.service.list().await?))
}

/// `POST /todos` with a raw text body, trimmed.
///
/// Bodies axum refuses to buffer (over the size limit, not UTF-8) are
/// validation errors like any other bad input.
pub async fn create_todo(
    State(state): State<Arc<AppState>>,
    body: Result<String, StringRejection>,
) -> Result<StatusCode, ApiError> {
    let body = body.map_err(|rejection| TodoCastError::InvalidBody(rejection.body_text()))?;
    state.service.create(body.trim()).await?;
    Ok(StatusCode::CREATED)
}

/// `PUT /todos/{id}`
pub async fn complete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service.complete(&id).await?;
    Ok(StatusCode::OK)
}

/// `GET /healthz`
pub async fn health_check(State(state): State<Arc<AppState>>) -> StatusCode {
    match state.service.health().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!("Health check failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
