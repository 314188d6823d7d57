//! HTTP surface for the Sikkim Tourism Assistant.
//!
//! A thin axum layer over the resolution pipeline: all decision logic lives
//! in `sikkim-chat`; this crate wires routes, shared state, CORS, and
//! graceful shutdown.

pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use sikkim_chat::{ChatSettings, Resolver};
use sikkim_core::{AppConfig, AppError, AppResult};
use sikkim_knowledge::KnowledgeBase;
use sikkim_llm::OllamaClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::cors::CorsLayer;

pub use state::AppState;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat", post(routes::chat))
        .route("/chat/stream", post(routes::chat_stream))
        .route("/health", get(routes::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Build the shared state from configuration.
///
/// Loads the knowledge base once (a load failure leaves it empty) and
/// constructs the backend client with the configured timeouts.
pub fn build_state(config: &AppConfig) -> Arc<AppState> {
    let knowledge = Arc::new(KnowledgeBase::load(&config.qa_file));

    let llm = Arc::new(OllamaClient::with_base_url(&config.ollama_url).with_timeouts(
        Duration::from_secs(config.probe_timeout_secs),
        Duration::from_secs(config.generate_timeout_secs),
        Duration::from_secs(config.stream_timeout_secs),
    ));

    let resolver = Resolver::new(knowledge, llm, ChatSettings::from(config));

    Arc::new(AppState::new(resolver))
}

/// Run the HTTP server until ctrl-c.
pub async fn serve(config: AppConfig) -> AppResult<()> {
    let state = build_state(&config);

    // One startup status line; per-request probes stay fresh regardless
    let status = state.resolver.backend_status().await;
    tracing::info!(
        "Generation model {}",
        if status.is_available() {
            "available"
        } else {
            "not available"
        }
    );

    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    Ok(())
}

/// Resolves when ctrl-c is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use sikkim_core::AppResult;
    use sikkim_knowledge::QaEntry;
    use sikkim_llm::{
        BackendStatus, GenerationOptions, LlmClient, LlmRequest, LlmResponse, LlmStream,
    };
    use tower::util::ServiceExt;

    /// Backend double that is never reachable.
    struct DownLlm;

    #[async_trait::async_trait]
    impl LlmClient for DownLlm {
        fn provider_name(&self) -> &str {
            "mock"
        }

        async fn status(&self, _model: &str) -> BackendStatus {
            BackendStatus::unreachable()
        }

        async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
            unreachable!("backend is down")
        }

        async fn stream(&self, _request: &LlmRequest) -> AppResult<LlmStream> {
            unreachable!("backend is down")
        }
    }

    fn test_router() -> Router {
        let knowledge = Arc::new(KnowledgeBase::from_entries(vec![QaEntry {
            question: "plan one day tour near rumtek monastery".to_string(),
            answer: "Start early from Gangtok and spend the morning at Rumtek.".to_string(),
        }]));

        let settings = ChatSettings {
            model: "mistral".to_string(),
            match_threshold: 0.6,
            stream_delay: Duration::ZERO,
            options: GenerationOptions::default(),
        };

        let resolver = Resolver::new(knowledge, Arc::new(DownLlm), settings);
        router(Arc::new(AppState::new(resolver)))
    }

    fn json_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_chat_returns_fixed_answer() {
        let response = test_router()
            .oneshot(json_request(
                "/chat",
                r#"{"message": "plan one day tour near rumtek monastery"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["source"], "fixed_qa");
        assert_eq!(
            value["response"],
            "Start early from Gangtok and spend the morning at Rumtek."
        );
    }

    #[tokio::test]
    async fn test_chat_with_empty_body_still_answers() {
        let response = test_router()
            .oneshot(json_request("/chat", "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value["source"], "predefined");
        assert!(!value["response"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_stream_frames() {
        let response = test_router()
            .oneshot(json_request(
                "/chat/stream",
                r#"{"message": "plan one day tour near rumtek monastery"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();

        let frames: Vec<&str> = text
            .split("\n\n")
            .filter(|frame| !frame.is_empty())
            .collect();
        assert!(frames.iter().all(|frame| frame.starts_with("data: ")));
        assert_eq!(
            *frames.last().unwrap(),
            "data: {\"text\":\"\",\"done\":true}"
        );
    }

    #[tokio::test]
    async fn test_health_reports_backend_down() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value["status"], "ok");
        assert_eq!(value["backend"]["reachable"], false);
    }
}
