//! Curated knowledge for the Sikkim Tourism Assistant.
//!
//! Provides the fixed Q&A knowledge base (loaded once at startup, read-only
//! afterward), the fuzzy fixed-response matcher, and the keyword fallback
//! selector used when neither a curated answer nor the generation backend
//! can serve a query.

pub mod fallback;
pub mod loader;
pub mod matcher;
pub mod types;

// Re-export commonly used types
pub use fallback::FallbackResponder;
pub use loader::KnowledgeBase;
pub use types::{MatchResult, QaEntry};
