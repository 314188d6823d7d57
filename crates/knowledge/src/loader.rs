//! Fixed Q&A knowledge base loader.
//!
//! The knowledge base is read once at process start from a JSON file and is
//! read-only afterward. A load failure is not fatal: the assistant runs with
//! an empty base and relies on the other response sources.

use std::path::Path;

use crate::types::QaEntry;

/// The curated fixed Q&A knowledge base.
///
/// Entries keep their file order; the matcher scans them in order so that
/// score ties resolve to the first-seen entry.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<QaEntry>,
}

impl KnowledgeBase {
    /// Load the knowledge base from a JSON file.
    ///
    /// The file holds an array of `{question, answer}` records. Any failure
    /// (missing file, unreadable contents, malformed JSON) logs a warning
    /// and yields an empty base rather than an error.
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Failed to read fixed Q&A file {:?}: {}", path, e);
                return Self::default();
            }
        };

        match serde_json::from_str::<Vec<QaEntry>>(&contents) {
            Ok(entries) => {
                tracing::info!("Loaded {} fixed Q&A pairs from {:?}", entries.len(), path);
                Self { entries }
            }
            Err(e) => {
                tracing::warn!("Failed to parse fixed Q&A file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Build a knowledge base from in-memory entries.
    pub fn from_entries(entries: Vec<QaEntry>) -> Self {
        Self { entries }
    }

    /// The stored entries, in file order.
    pub fn entries(&self) -> &[QaEntry] {
        &self.entries
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the base holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
