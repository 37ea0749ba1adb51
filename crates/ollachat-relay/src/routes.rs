use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use async_stream::stream;
use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use colored::Colorize;
use futures_util::{Stream, StreamExt};

use ollachat_types::{encode_frame, flatten_prompt, RelayRequest, StreamEvent, DONE_FRAME};

use crate::fallback::{fallback_notice, fallback_stream};
use crate::registry::ModelRegistry;
use crate::upstream::{ChunkStream, UpstreamClient};

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
    pub registry: Arc<ModelRegistry>,
    pub max_call_duration: Duration,
}

/// Create router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Streaming core
        .route("/api/chat", post(relay_chat))
        // Model registry proxy (marketplace surface)
        .route("/api/models", get(list_models))
        .route("/api/models/pull", post(pull_model))
        .route("/api/models/:name", delete(delete_model))
        .with_state(state)
}

/// POST /api/chat - Relay a chat request to the upstream generate endpoint
///
/// Every accepted request answers 200 with a streamed body; upstream trouble
/// is absorbed into the fallback stream rather than surfaced as a 5xx.
async fn relay_chat(
    State(state): State<AppState>,
    Json(request): Json<RelayRequest>,
) -> Response {
    let prompt = flatten_prompt(&request.messages);
    let model = request.model;

    let chunks = match state.upstream.generate(&model, &prompt).await {
        Ok(chunks) => chunks,
        Err(e) => {
            eprintln!(
                "{} Upstream unavailable for model {}: {}",
                "⚠️".yellow(),
                model,
                e
            );
            fallback_stream(fallback_notice(&model, &e.to_string()))
        }
    };

    let body = Body::from_stream(relay_body_stream(chunks, state.max_call_duration));
    let mut response = Response::new(body);
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    response
}

/// Frame a chunk sequence as `data: {json}\n\n` records closed by the
/// terminal sentinel.
///
/// The sentinel is emitted on every exit path, including the overall call
/// ceiling. Dropping the returned stream (client disconnect) drops the
/// producer and with it any in-flight upstream request.
pub fn relay_body_stream(
    mut chunks: ChunkStream,
    ceiling: Duration,
) -> impl Stream<Item = Result<Bytes, Infallible>> {
    stream! {
        let deadline = tokio::time::Instant::now() + ceiling;
        loop {
            let next = tokio::select! {
                _ = tokio::time::sleep_until(deadline) => None,
                chunk = chunks.next() => chunk,
            };
            match next {
                Some(content) => {
                    let frame = encode_frame(&StreamEvent::Text { content });
                    yield Ok::<_, Infallible>(Bytes::from(frame));
                }
                None => break,
            }
        }
        yield Ok(Bytes::from_static(DONE_FRAME.as_bytes()));
    }
}

/// GET /api/models - List installed models
async fn list_models(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let models = state.registry.list().await.map_err(AppError::Upstream)?;
    Ok(Json(serde_json::json!({ "models": models })))
}

#[derive(serde::Deserialize)]
struct PullRequest {
    name: String,
}

/// POST /api/models/pull - Install a model
async fn pull_model(
    State(state): State<AppState>,
    Json(payload): Json<PullRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .registry
        .pull(&payload.name)
        .await
        .map_err(AppError::Upstream)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "name": payload.name,
    })))
}

/// DELETE /api/models/:name - Remove an installed model
async fn delete_model(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .registry
        .delete(&name)
        .await
        .map_err(AppError::Upstream)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "name": name,
    })))
}

/// Error handling for the registry routes
#[derive(Debug)]
enum AppError {
    Upstream(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Upstream(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
        };

        let body = Json(serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
