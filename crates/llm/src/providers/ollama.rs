//! Ollama LLM provider implementation.
//!
//! This module provides integration with Ollama, a local LLM runtime.
//! Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::client::{BackendStatus, LlmClient, LlmRequest, LlmResponse, LlmStream, LlmStreamChunk};
use futures::StreamExt;
use serde::Deserialize;
use sikkim_core::{AppError, AppResult};
use std::time::Duration;

/// Ollama generate API response format.
///
/// The same shape arrives as a single object (non-streamed) or as
/// newline-delimited objects each carrying a `response` fragment (streamed).
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

/// Ollama tags API response format.
#[derive(Debug, Deserialize)]
struct OllamaTags {
    #[serde(default)]
    models: Vec<OllamaModelTag>,
}

#[derive(Debug, Deserialize)]
struct OllamaModelTag {
    #[serde(default)]
    name: String,
}

/// Ollama LLM client.
pub struct OllamaClient {
    /// Base URL for Ollama API
    base_url: String,

    /// HTTP client
    client: reqwest::Client,

    /// Timeout for the availability probe
    probe_timeout: Duration,

    /// Timeout for a non-streamed generation call
    generate_timeout: Duration,

    /// Timeout for a streamed generation call
    stream_timeout: Duration,
}

impl OllamaClient {
    /// Create a new Ollama client with default settings.
    ///
    /// Default URL: http://localhost:11434
    pub fn new() -> Self {
        Self::with_base_url("http://localhost:11434")
    }

    /// Create a new Ollama client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
            probe_timeout: Duration::from_secs(2),
            generate_timeout: Duration::from_secs(10),
            stream_timeout: Duration::from_secs(30),
        }
    }

    /// Override the probe and generation timeouts.
    pub fn with_timeouts(
        mut self,
        probe_timeout: Duration,
        generate_timeout: Duration,
        stream_timeout: Duration,
    ) -> Self {
        self.probe_timeout = probe_timeout;
        self.generate_timeout = generate_timeout;
        self.stream_timeout = stream_timeout;
        self
    }

    /// Whether the target model appears in the advertised model list.
    ///
    /// Case-insensitive substring check: "mistral" matches "mistral:latest".
    fn model_available(tags: &OllamaTags, model: &str) -> bool {
        let needle = model.to_lowercase();
        tags.models
            .iter()
            .any(|tag| tag.name.to_lowercase().contains(&needle))
    }

    /// Parse one NDJSON stream line into a chunk.
    ///
    /// Broken or garbled lines are skipped rather than aborting the stream.
    fn parse_stream_line(line: &str) -> Option<LlmStreamChunk> {
        match serde_json::from_str::<OllamaResponse>(line) {
            Ok(parsed) => Some(LlmStreamChunk {
                content: parsed.response,
                done: parsed.done,
            }),
            Err(e) => {
                tracing::debug!("Skipping malformed stream line: {}", e);
                None
            }
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn status(&self, model: &str) -> BackendStatus {
        let url = format!("{}/api/tags", self.base_url);

        let response = match self
            .client
            .get(&url)
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Cannot connect to Ollama backend: {}", e);
                return BackendStatus::unreachable();
            }
        };

        if !response.status().is_success() {
            tracing::warn!("Ollama tags endpoint returned {}", response.status());
            return BackendStatus::unreachable();
        }

        let tags: OllamaTags = match response.json().await {
            Ok(tags) => tags,
            Err(e) => {
                tracing::warn!("Malformed Ollama tags response: {}", e);
                return BackendStatus::unreachable();
            }
        };

        BackendStatus {
            reachable: true,
            model_ready: Self::model_available(&tags, model),
        }
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending completion request to Ollama");
        tracing::debug!("Request: {:?}", request);

        let mut request = request.clone();
        request.stream = false;

        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .timeout(self.generate_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        // For non-streaming, Ollama returns a single JSON object
        let parsed: OllamaResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Ollama response: {}", e)))?;

        tracing::info!("Received completion from Ollama");

        Ok(LlmResponse {
            content: parsed.response,
            model: request.model,
            done: parsed.done,
        })
    }

    async fn stream(&self, request: &LlmRequest) -> AppResult<LlmStream> {
        tracing::info!("Starting streaming request to Ollama");
        tracing::debug!("Request: {:?}", request);

        let mut request = request.clone();
        request.stream = true; // Ensure streaming is enabled

        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .timeout(self.stream_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send streaming request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        // Ollama sends newline-delimited JSON; a line may straddle two byte
        // chunks, so buffer until a full line is available
        let mut bytes_stream = response.bytes_stream();

        let stream = async_stream::stream! {
            let mut buffer = String::new();
            let mut finished = false;

            while let Some(next) = bytes_stream.next().await {
                match next {
                    Ok(bytes) => {
                        buffer.push_str(&String::from_utf8_lossy(&bytes));

                        while let Some(newline) = buffer.find('\n') {
                            let line = buffer[..newline].trim().to_string();
                            buffer.drain(..=newline);

                            if line.is_empty() {
                                continue;
                            }

                            if let Some(chunk) = Self::parse_stream_line(&line) {
                                let done = chunk.done;
                                yield Ok(chunk);
                                if done {
                                    finished = true;
                                    break;
                                }
                            }
                        }

                        if finished {
                            break;
                        }
                    }
                    Err(e) => {
                        yield Err(AppError::Llm(format!("Stream error: {}", e)));
                        finished = true;
                        break;
                    }
                }
            }

            // Trailing line without a newline terminator
            if !finished {
                let line = buffer.trim();
                if !line.is_empty() {
                    if let Some(chunk) = Self::parse_stream_line(line) {
                        yield Ok(chunk);
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_client_creation() {
        let client = OllamaClient::new();
        assert_eq!(client.provider_name(), "ollama");
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_with_timeouts() {
        let client = OllamaClient::new().with_timeouts(
            Duration::from_secs(2),
            Duration::from_secs(10),
            Duration::from_secs(30),
        );
        assert_eq!(client.probe_timeout, Duration::from_secs(2));
        assert_eq!(client.stream_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_model_available_is_case_insensitive_substring() {
        let tags: OllamaTags = serde_json::from_str(
            r#"{"models": [{"name": "Mistral:latest"}, {"name": "llama3:8b"}]}"#,
        )
        .unwrap();

        assert!(OllamaClient::model_available(&tags, "mistral"));
        assert!(OllamaClient::model_available(&tags, "llama3"));
        assert!(!OllamaClient::model_available(&tags, "gemma"));
    }

    #[test]
    fn test_model_available_empty_list() {
        let tags: OllamaTags = serde_json::from_str(r#"{"models": []}"#).unwrap();
        assert!(!OllamaClient::model_available(&tags, "mistral"));
    }

    #[test]
    fn test_parse_stream_line() {
        let chunk =
            OllamaClient::parse_stream_line(r#"{"response": "Gangtok ", "done": false}"#).unwrap();
        assert_eq!(chunk.content, "Gangtok ");
        assert!(!chunk.done);

        let last = OllamaClient::parse_stream_line(r#"{"response": "", "done": true}"#).unwrap();
        assert!(last.done);
    }

    #[test]
    fn test_parse_stream_line_skips_garbage() {
        assert!(OllamaClient::parse_stream_line("{broken json").is_none());
        assert!(OllamaClient::parse_stream_line(r#"{"unrelated": 1}"#).is_none());
    }
}
