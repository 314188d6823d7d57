//! LLM integration crate for the Sikkim Tourism Assistant.
//!
//! This crate wraps the Ollama generation backend behind a trait-based
//! interface: a bounded availability probe, a non-streamed completion call,
//! and an incremental token stream.
//!
//! # Example
//! ```no_run
//! use sikkim_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Tell me about Gangtok", "mistral");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod providers;

// Re-export main types
pub use client::{
    BackendStatus, GenerationOptions, LlmClient, LlmRequest, LlmResponse, LlmStream,
    LlmStreamChunk,
};
pub use providers::OllamaClient;
