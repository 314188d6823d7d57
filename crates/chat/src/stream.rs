//! Streaming transport adapter.
//!
//! Converts a resolved answer into a finite, ordered sequence of chunks.
//! Two modes exist: a materialized answer is re-chunked word by word with a
//! short delay to simulate incremental delivery, and a live backend stream
//! is relayed fragment by fragment. Either way the sequence ends in exactly
//! one terminal chunk, and nothing follows a terminal chunk.

use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use sikkim_llm::LlmStream;
use std::pin::Pin;
use std::time::Duration;

/// One unit of an incrementally delivered response.
///
/// Wire form matches the frames the web client consumes: `done` and `error`
/// are omitted unless set, so a content frame is just `{"text": "word "}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Incremental text payload
    pub text: String,

    /// Whether this chunk terminates the stream
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub done: bool,

    /// Error message, set only on an aborted stream's terminal chunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StreamChunk {
    /// A content chunk.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            done: false,
            error: None,
        }
    }

    /// The terminal chunk of a completed stream.
    pub fn done() -> Self {
        Self {
            text: String::new(),
            done: true,
            error: None,
        }
    }

    /// The terminal chunk of an aborted stream.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            done: true,
            error: Some(message.into()),
        }
    }

    /// Whether this chunk ends the stream.
    pub fn is_terminal(&self) -> bool {
        self.done
    }
}

/// A finite, non-restartable sequence of chunks, consumed by one client.
pub type ChunkStream = Pin<Box<dyn Stream<Item = StreamChunk> + Send>>;

/// Stream a fully materialized answer word by word.
///
/// Each word becomes one chunk carrying the word plus a trailing space,
/// with `delay` between chunks, followed by the terminal chunk.
pub fn materialize(text: String, delay: Duration) -> ChunkStream {
    Box::pin(async_stream::stream! {
        let words: Vec<String> = text.split_whitespace().map(str::to_string).collect();

        for word in words {
            yield StreamChunk::text(format!("{} ", word));
            tokio::time::sleep(delay).await;
        }

        yield StreamChunk::done();
    })
}

/// Relay a live backend token stream.
///
/// Each upstream fragment is re-emitted in arrival order. Upstream
/// completion produces the terminal chunk; an upstream transport error
/// produces exactly one terminal error chunk and ends the stream. An
/// upstream that ends without signalling completion is still terminated
/// with a single done chunk.
pub fn relay(upstream: LlmStream) -> ChunkStream {
    Box::pin(async_stream::stream! {
        let mut upstream = upstream;
        let mut terminated = false;

        while let Some(item) = upstream.next().await {
            match item {
                Ok(chunk) => {
                    if !chunk.content.is_empty() {
                        yield StreamChunk::text(chunk.content);
                    }
                    if chunk.done {
                        yield StreamChunk::done();
                        terminated = true;
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!("Backend stream aborted: {}", e);
                    yield StreamChunk::error(e.to_string());
                    terminated = true;
                    break;
                }
            }
        }

        if !terminated {
            yield StreamChunk::done();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sikkim_core::AppError;
    use sikkim_llm::LlmStreamChunk;

    async fn collect(stream: ChunkStream) -> Vec<StreamChunk> {
        stream.collect().await
    }

    fn upstream_of(items: Vec<Result<LlmStreamChunk, AppError>>) -> LlmStream {
        Box::pin(futures::stream::iter(items))
    }

    #[tokio::test]
    async fn test_materialize_round_trip() {
        let text = "Rumtek is a short drive from Gangtok".to_string();
        let chunks = collect(materialize(text.clone(), Duration::ZERO)).await;

        let (terminal, content) = chunks.split_last().unwrap();
        assert!(terminal.done);
        assert!(terminal.error.is_none());

        let joined: String = content.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(joined.trim_end(), text);
    }

    #[tokio::test]
    async fn test_materialize_exactly_one_terminal_chunk() {
        let chunks = collect(materialize("hello there".to_string(), Duration::ZERO)).await;

        let terminals = chunks.iter().filter(|c| c.done).count();
        assert_eq!(terminals, 1);
        assert!(chunks.last().unwrap().done);
    }

    #[tokio::test]
    async fn test_materialize_empty_text_still_terminates() {
        let chunks = collect(materialize(String::new(), Duration::ZERO)).await;
        assert_eq!(chunks, vec![StreamChunk::done()]);
    }

    #[tokio::test]
    async fn test_relay_preserves_order_and_terminates() {
        let upstream = upstream_of(vec![
            Ok(LlmStreamChunk {
                content: "Gangtok ".to_string(),
                done: false,
            }),
            Ok(LlmStreamChunk {
                content: "is lovely".to_string(),
                done: false,
            }),
            Ok(LlmStreamChunk {
                content: String::new(),
                done: true,
            }),
        ]);

        let chunks = collect(relay(upstream)).await;
        assert_eq!(
            chunks,
            vec![
                StreamChunk::text("Gangtok "),
                StreamChunk::text("is lovely"),
                StreamChunk::done(),
            ]
        );
    }

    #[tokio::test]
    async fn test_relay_final_fragment_with_content() {
        let upstream = upstream_of(vec![Ok(LlmStreamChunk {
            content: "bye".to_string(),
            done: true,
        })]);

        let chunks = collect(relay(upstream)).await;
        assert_eq!(chunks, vec![StreamChunk::text("bye"), StreamChunk::done()]);
    }

    #[tokio::test]
    async fn test_relay_error_emits_single_terminal_error_chunk() {
        let upstream = upstream_of(vec![
            Ok(LlmStreamChunk {
                content: "partial ".to_string(),
                done: false,
            }),
            Err(AppError::Llm("connection reset".to_string())),
            // Anything after the error must never surface
            Ok(LlmStreamChunk {
                content: "ghost".to_string(),
                done: false,
            }),
        ]);

        let chunks = collect(relay(upstream)).await;
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], StreamChunk::text("partial "));

        let terminal = &chunks[1];
        assert!(terminal.done);
        assert!(terminal.error.as_deref().unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_relay_terminates_truncated_upstream() {
        let upstream = upstream_of(vec![Ok(LlmStreamChunk {
            content: "cut off".to_string(),
            done: false,
        })]);

        let chunks = collect(relay(upstream)).await;
        assert_eq!(
            chunks,
            vec![StreamChunk::text("cut off"), StreamChunk::done()]
        );
    }

    #[test]
    fn test_chunk_wire_format() {
        let content = serde_json::to_string(&StreamChunk::text("word ")).unwrap();
        assert_eq!(content, r#"{"text":"word "}"#);

        let done = serde_json::to_string(&StreamChunk::done()).unwrap();
        assert_eq!(done, r#"{"text":"","done":true}"#);

        let error = serde_json::to_string(&StreamChunk::error("boom")).unwrap();
        assert_eq!(error, r#"{"text":"","done":true,"error":"boom"}"#);
    }
}
