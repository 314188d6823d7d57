//! Shared state for HTTP handlers.

use sikkim_chat::Resolver;

/// Shared state for all HTTP handlers.
///
/// The resolver owns the long-lived read-only collaborators (knowledge
/// base, fallback tables, backend client), so this is constructed once at
/// startup and shared behind an `Arc`.
pub struct AppState {
    /// The response resolution pipeline
    pub resolver: Resolver,
}

impl AppState {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }
}
