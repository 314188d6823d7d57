//! Response resolution pipeline.
//!
//! Each request is resolved independently from a single message string, in
//! a fixed order: curated fixed Q&A first, then the generation backend if
//! it is up and has the model loaded, then the keyword fallback. The first
//! source that produces an answer wins; each source is attempted at most
//! once, and only the fallback is allowed to be the answer of last resort.

use serde::{Deserialize, Serialize};
use sikkim_core::config::AppConfig;
use sikkim_knowledge::{FallbackResponder, KnowledgeBase};
use sikkim_llm::{BackendStatus, GenerationOptions, LlmClient, LlmRequest};
use sikkim_prompt::{build_prompt, PromptDefinition};
use std::sync::Arc;
use std::time::Duration;

use crate::stream::{materialize, relay, ChunkStream};

/// Which resolution stage produced the final answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// A curated fixed Q&A entry
    FixedQa,

    /// The generation backend
    Generated,

    /// The keyword fallback
    Predefined,
}

impl AnswerSource {
    /// Stable string form, as used on the wire and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::FixedQa => "fixed_qa",
            AnswerSource::Generated => "generated",
            AnswerSource::Predefined => "predefined",
        }
    }
}

/// One resolved answer with its provenance tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedAnswer {
    /// The answer text
    pub text: String,

    /// Which stage produced it
    pub source: AnswerSource,
}

/// Tunables for the pipeline, extracted from the application config.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// Generation model identifier
    pub model: String,

    /// Minimum effective score for a fixed Q&A match
    pub match_threshold: f32,

    /// Delay between chunks when streaming a materialized answer
    pub stream_delay: Duration,

    /// Sampling options for generation calls
    pub options: GenerationOptions,
}

impl From<&AppConfig> for ChatSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            match_threshold: config.match_threshold,
            stream_delay: Duration::from_millis(config.stream_delay_ms),
            options: GenerationOptions {
                temperature: config.generation.temperature,
                top_p: config.generation.top_p,
                repeat_penalty: config.generation.repeat_penalty,
                num_ctx: config.generation.num_ctx,
                num_predict: config.generation.num_predict,
            },
        }
    }
}

/// The resolution pipeline instance.
///
/// Owns the long-lived, read-only collaborators (knowledge base, fallback
/// tables, prompt definition) and the backend client; constructed once and
/// shared across requests.
pub struct Resolver {
    knowledge: Arc<KnowledgeBase>,
    llm: Arc<dyn LlmClient>,
    fallback: FallbackResponder,
    prompt: PromptDefinition,
    settings: ChatSettings,
}

impl Resolver {
    /// Create a pipeline over a knowledge base and a backend client.
    pub fn new(knowledge: Arc<KnowledgeBase>, llm: Arc<dyn LlmClient>, settings: ChatSettings) -> Self {
        Self {
            knowledge,
            llm,
            fallback: FallbackResponder::default(),
            prompt: PromptDefinition::assistant_default(),
            settings,
        }
    }

    /// Probe the backend for the configured model.
    ///
    /// Recomputed per call; availability is never cached across requests.
    pub async fn backend_status(&self) -> BackendStatus {
        self.llm.status(&self.settings.model).await
    }

    /// Resolve one message to an answer.
    ///
    /// Never fails: the keyword fallback guarantees an answer when the
    /// curated base misses and the backend is down or misbehaves.
    pub async fn resolve(&self, message: &str, lang: Option<&str>) -> ResolvedAnswer {
        let matched = self
            .knowledge
            .find_best_match(message, self.settings.match_threshold);

        if let Some(entry) = matched.entry {
            tracing::info!(
                "Fixed Q&A match (score {:.2}): {}",
                matched.score,
                entry.question
            );
            return ResolvedAnswer {
                text: entry.answer,
                source: AnswerSource::FixedQa,
            };
        }

        if let Some(text) = self.try_generate(message, lang).await {
            return ResolvedAnswer {
                text,
                source: AnswerSource::Generated,
            };
        }

        tracing::info!("Using predefined responses");
        ResolvedAnswer {
            text: self.fallback.respond(message),
            source: AnswerSource::Predefined,
        }
    }

    /// Resolve one message to a chunk stream.
    ///
    /// A curated or fallback answer is streamed word by word; a live
    /// backend is relayed token by token. Like `resolve`, this never fails
    /// a request.
    pub async fn resolve_stream(&self, message: &str, lang: Option<&str>) -> ChunkStream {
        let matched = self
            .knowledge
            .find_best_match(message, self.settings.match_threshold);

        if let Some(entry) = matched.entry {
            tracing::info!(
                "Fixed Q&A match (score {:.2}): {}",
                matched.score,
                entry.question
            );
            return materialize(entry.answer, self.settings.stream_delay);
        }

        if self.backend_status().await.is_available() {
            match self.generation_request(message, lang, true) {
                Ok(request) => match self.llm.stream(&request).await {
                    Ok(upstream) => return relay(upstream),
                    Err(e) => tracing::warn!("Failed to open backend stream: {}", e),
                },
                Err(e) => tracing::warn!("Failed to build prompt: {}", e),
            }
        } else {
            tracing::info!("Generation backend unavailable, streaming predefined response");
        }

        materialize(self.fallback.respond(message), self.settings.stream_delay)
    }

    /// Attempt the generation stage. `None` means "pass to the fallback".
    async fn try_generate(&self, message: &str, lang: Option<&str>) -> Option<String> {
        let status = self.backend_status().await;
        if !status.is_available() {
            tracing::info!(
                "Generation backend unavailable (reachable: {}, model ready: {})",
                status.reachable,
                status.model_ready
            );
            return None;
        }

        let request = match self.generation_request(message, lang, false) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("Failed to build prompt: {}", e);
                return None;
            }
        };

        match self.llm.complete(&request).await {
            Ok(response) => {
                let text = response.content.trim().to_string();
                if text.is_empty() {
                    tracing::warn!("Generation backend returned empty text");
                    None
                } else {
                    Some(text)
                }
            }
            Err(e) => {
                // Backend failures are recovered by the fallback, never
                // surfaced to the caller
                tracing::warn!("Generation failed: {}", e);
                None
            }
        }
    }

    /// Build the domain-scoped generation request for a message.
    fn generation_request(
        &self,
        message: &str,
        lang: Option<&str>,
        streaming: bool,
    ) -> sikkim_core::AppResult<LlmRequest> {
        let built = build_prompt(&self.prompt, message, lang)?;

        let mut request =
            LlmRequest::new(built.text, self.settings.model.clone()).with_options(self.settings.options);
        if streaming {
            request = request.with_streaming();
        }

        Ok(request)
    }
}
