//! HTTP routes for the assistant.
//!
//! Three endpoints: a JSON chat endpoint, a streaming chat endpoint that
//! frames chunks as server-sent events, and a health probe. A missing
//! `message` field is treated as an empty query, which deterministically
//! resolves to a predefined response rather than failing the request.

use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use sikkim_chat::{AnswerSource, StreamChunk};
use sikkim_llm::BackendStatus;
use std::convert::Infallible;
use std::sync::Arc;

use crate::state::AppState;

type AppStateArc = Arc<AppState>;

/// Inbound chat request.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's message; absent field degrades to the empty string
    #[serde(default)]
    pub message: String,

    /// Optional language hint (e.g., "en", "hi")
    #[serde(default)]
    pub lang: Option<String>,
}

/// Outbound chat response.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub status: &'static str,
    pub source: AnswerSource,
}

/// Health report.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: BackendStatus,
}

/// `POST /chat` — resolve one message to a complete JSON answer.
pub async fn chat(
    State(state): State<AppStateArc>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    tracing::info!("Received message: {}", request.message);

    let answer = state
        .resolver
        .resolve(&request.message, request.lang.as_deref())
        .await;

    tracing::debug!("Resolved via {}", answer.source.as_str());

    Json(ChatResponse {
        response: answer.text,
        status: "success",
        source: answer.source,
    })
}

/// `POST /chat/stream` — resolve one message to an event stream.
///
/// Frames are `data: <chunk JSON>\n\n`; the last frame carries
/// `"done": true` (plus `"error"` if the stream aborted).
pub async fn chat_stream(
    State(state): State<AppStateArc>,
    Json(request): Json<ChatRequest>,
) -> Response {
    tracing::info!("Received streaming request: {}", request.message);

    let chunks = state
        .resolver
        .resolve_stream(&request.message, request.lang.as_deref())
        .await;

    let frames = chunks.map(|chunk| Ok::<_, Infallible>(sse_frame(&chunk)));

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(frames),
    )
        .into_response()
}

/// `GET /health` — liveness plus a fresh backend availability report.
pub async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    let backend = state.resolver.backend_status().await;

    Json(HealthResponse {
        status: "ok",
        backend,
    })
}

/// Frame one chunk as a server-sent event.
pub fn sse_frame(chunk: &StreamChunk) -> String {
    // StreamChunk serialization is infallible (strings and flags only)
    let json = serde_json::to_string(chunk).unwrap_or_default();
    format!("data: {}\n\n", json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_message_defaults_to_empty() {
        let request: ChatRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.message, "");
        assert!(request.lang.is_none());
    }

    #[test]
    fn test_request_with_lang() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"message": "rumtek", "lang": "hi"}"#).unwrap();
        assert_eq!(request.message, "rumtek");
        assert_eq!(request.lang.as_deref(), Some("hi"));
    }

    #[test]
    fn test_sse_frame_format() {
        let frame = sse_frame(&StreamChunk::text("word "));
        assert_eq!(frame, "data: {\"text\":\"word \"}\n\n");

        let terminal = sse_frame(&StreamChunk::done());
        assert_eq!(terminal, "data: {\"text\":\"\",\"done\":true}\n\n");
    }
}
