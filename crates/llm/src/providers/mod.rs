//! Generation backend providers.

pub mod ollama;

pub use ollama::OllamaClient;
