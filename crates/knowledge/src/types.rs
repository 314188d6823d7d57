//! Knowledge base types.

use serde::{Deserialize, Serialize};

/// A curated question/answer pair.
///
/// Entries are immutable once loaded; the knowledge base keeps them in file
/// order, which is the deterministic tie-break for equal match scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaEntry {
    /// The stored question text
    pub question: String,

    /// The authoritative answer
    pub answer: String,
}

/// Result of matching a query against the knowledge base.
///
/// Produced fresh per request; never persisted.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// The best-matching entry, if its score reached the threshold
    pub entry: Option<QaEntry>,

    /// Effective score of the best entry seen, in [0, 1]
    pub score: f32,
}

impl MatchResult {
    /// A miss: no entry reached the threshold.
    pub fn none() -> Self {
        Self {
            entry: None,
            score: 0.0,
        }
    }

    /// Whether the match succeeded.
    pub fn is_match(&self) -> bool {
        self.entry.is_some()
    }
}
