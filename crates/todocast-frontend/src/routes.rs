//! Page, image and proxy handlers.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use super::server::FrontendState;

fn backend_unavailable() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "application/json")],
        r#"{"error": "Backend unavailable"}"#,
    )
        .into_response()
}

fn mirror_status(status: reqwest::StatusCode) -> StatusCode {
    StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY)
}

/// `GET /` and `GET /todos`
pub async fn index_page(State(state): State<Arc<FrontendState>>) -> Response {
    match tokio::fs::read_to_string(&state.config.html_file).await {
        Ok(html) => {
            tracing::info!("Served index.html");
            Html(html).into_response()
        }
        Err(e) => {
            tracing::error!("Error serving HTML: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `GET /image.jpg`
pub async fn image(State(state): State<Arc<FrontendState>>) -> Response {
    match tokio::fs::read(&state.config.image_path).await {
        Ok(bytes) => {
            tracing::info!("Served image.jpg");
            ([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response()
        }
        Err(e) => {
            tracing::error!("Error serving image: {e}");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// `GET /api/todos` → backend `GET /todos`. Always 200 when the backend
/// answered at all.
pub async fn proxy_list(State(state): State<Arc<FrontendState>>) -> Response {
    let result = async {
        let resp = state.client.get(state.backend("/todos")).send().await?;
        Ok::<_, reqwest::Error>(resp.bytes().await?)
    }
    .await;

    match result {
        Ok(body) => {
            tracing::info!("Proxied GET /api/todos to backend");
            ([(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        Err(e) => {
            tracing::error!("Backend error: {e}");
            backend_unavailable()
        }
    }
}

/// `POST /api/todos` → backend `POST /todos`, mirroring its status.
pub async fn proxy_create(State(state): State<Arc<FrontendState>>, body: String) -> Response {
    let item = body.trim().to_string();
    let result = async {
        let resp = state
            .client
            .post(state.backend("/todos"))
            .body(item.clone())
            .send()
            .await?;
        let status = resp.status();
        Ok::<_, reqwest::Error>((status, resp.bytes().await?))
    }
    .await;

    match result {
        Ok((status, body)) => {
            tracing::info!("Proxied POST /api/todos to backend: {item}");
            (
                mirror_status(status),
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Backend error on POST: {e}");
            backend_unavailable()
        }
    }
}

/// `PUT /api/todos/{id}` → backend `PUT /todos/{id}`, mirroring its status.
pub async fn proxy_complete(
    State(state): State<Arc<FrontendState>>,
    Path(id): Path<String>,
) -> StatusCode {
    match state.client.put(state.backend(&format!("/todos/{id}"))).send().await {
        Ok(resp) => {
            tracing::info!("Proxied PUT /api/todos/{id} to backend");
            mirror_status(resp.status())
        }
        Err(e) => {
            tracing::error!("Backend error on PUT: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// `GET /healthz`
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
