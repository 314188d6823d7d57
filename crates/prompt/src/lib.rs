//! Prompt construction for the Sikkim Tourism Assistant.
//!
//! Generation requests are always domain-scoped: the user's message is
//! embedded in a template that pins the assistant to Sikkim tourism. The
//! optional language hint from the inbound request is resolved here — the
//! resolution pipeline itself never branches on language.

pub mod builder;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use types::{BuiltPrompt, PromptDefinition};
