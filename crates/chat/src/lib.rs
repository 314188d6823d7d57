//! Response resolution pipeline and streaming transport adapter.
//!
//! This crate holds the decision logic of the assistant: for each inbound
//! message it resolves one answer from three sources (curated fixed Q&A,
//! the generation backend, the keyword fallback) and can deliver that
//! answer as an incrementally produced chunk stream.

pub mod resolver;
pub mod stream;

// Re-export main types
pub use resolver::{AnswerSource, ChatSettings, ResolvedAnswer, Resolver};
pub use stream::{materialize, relay, ChunkStream, StreamChunk};
