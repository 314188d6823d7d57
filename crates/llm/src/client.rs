//! LLM client abstraction and request/response types.
//!
//! This module defines the core abstractions for talking to the generation
//! backend: the request/response shapes, the incremental stream chunk, the
//! availability report, and the `LlmClient` trait the pipeline depends on.

use futures::Stream;
use serde::{Deserialize, Serialize};
use sikkim_core::AppResult;
use std::pin::Pin;

/// LLM completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    /// The prompt text to send to the backend
    pub prompt: String,

    /// Model identifier (e.g., "mistral")
    pub model: String,

    /// Enable streaming responses
    #[serde(default)]
    pub stream: bool,

    /// Sampling options forwarded to the backend
    #[serde(default)]
    pub options: GenerationOptions,
}

/// Sampling options forwarded verbatim to the backend's `options` object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub repeat_penalty: f32,
    pub num_ctx: u32,
    pub num_predict: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            repeat_penalty: 1.1,
            num_ctx: 4096,
            num_predict: 512,
        }
    }
}

impl LlmRequest {
    /// Create a new LLM request with required fields.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            stream: false,
            options: GenerationOptions::default(),
        }
    }

    /// Enable streaming for this request.
    pub fn with_streaming(mut self) -> Self {
        self.stream = true;
        self
    }

    /// Set the sampling options.
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }
}

/// LLM completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated text
    pub content: String,

    /// Model that generated the response
    pub model: String,

    /// Whether the response was complete
    #[serde(default = "default_true")]
    pub done: bool,
}

fn default_true() -> bool {
    true
}

/// A chunk from a streaming LLM response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmStreamChunk {
    /// Incremental text content
    pub content: String,

    /// Whether this is the final chunk
    #[serde(default)]
    pub done: bool,
}

/// Stream of LLM chunks.
pub type LlmStream = Pin<Box<dyn Stream<Item = AppResult<LlmStreamChunk>> + Send>>;

/// Availability report for the generation backend.
///
/// Recomputed on every request that needs it; the backend may come and go
/// between calls, so this is never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendStatus {
    /// Whether the backend answered the probe at all
    pub reachable: bool,

    /// Whether the target model appears in the backend's model list
    pub model_ready: bool,
}

impl BackendStatus {
    /// An unreachable backend.
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            model_ready: false,
        }
    }

    /// Whether the backend can serve a generation request right now.
    pub fn is_available(&self) -> bool {
        self.reachable && self.model_ready
    }
}

/// Trait for generation backends.
///
/// This trait abstracts the backend so the resolution pipeline can be
/// exercised in tests without a live service.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the provider name (e.g., "ollama").
    fn provider_name(&self) -> &str;

    /// Probe backend availability for the given model.
    ///
    /// Bounded by a short timeout. Any connection failure, timeout, or
    /// malformed response reports an unreachable backend; this call never
    /// returns an error.
    async fn status(&self, model: &str) -> BackendStatus;

    /// Perform a non-streaming completion.
    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse>;

    /// Perform a streaming completion.
    ///
    /// Returns a stream of incremental chunks ending with one `done` chunk.
    async fn stream(&self, request: &LlmRequest) -> AppResult<LlmStream>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = LlmRequest::new("Tell me about Gangtok", "mistral").with_streaming();

        assert_eq!(request.prompt, "Tell me about Gangtok");
        assert_eq!(request.model, "mistral");
        assert!(request.stream);
        assert_eq!(request.options.num_ctx, 4096);
    }

    #[test]
    fn test_request_wire_shape() {
        let request = LlmRequest::new("hello", "mistral");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "mistral");
        assert_eq!(value["stream"], false);
        // The backend expects the sampling knobs nested under "options"
        assert_eq!(value["options"]["num_predict"], 512);
        assert_eq!(value["options"]["repeat_penalty"], serde_json::json!(1.1f32));
    }

    #[test]
    fn test_backend_status_availability() {
        assert!(!BackendStatus::unreachable().is_available());
        assert!(!BackendStatus {
            reachable: true,
            model_ready: false
        }
        .is_available());
        assert!(BackendStatus {
            reachable: true,
            model_ready: true
        }
        .is_available());
    }
}
