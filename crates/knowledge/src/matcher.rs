//! Fixed-response matcher.
//!
//! Scores a free-text query against every stored question and returns the
//! best entry when its score reaches the threshold. The score combines a
//! character-level sequence-similarity ratio with a word-overlap boost, so
//! both near-verbatim queries and reworded ones land on the curated answer.

use std::collections::HashSet;

use crate::loader::KnowledgeBase;
use crate::types::MatchResult;

/// Default minimum effective score for a match (inclusive).
pub const DEFAULT_THRESHOLD: f32 = 0.6;

impl KnowledgeBase {
    /// Find the best-matching stored question for a query.
    ///
    /// Both sides are normalized by lower-casing and trimming. Per entry the
    /// effective score is the sequence ratio, boosted to the word-overlap
    /// ratio when more than half of the stored question's words appear in
    /// the query. The highest effective score wins; ties keep the
    /// first-seen entry. A match requires `score >= threshold`.
    pub fn find_best_match(&self, query: &str, threshold: f32) -> MatchResult {
        let query_norm = query.to_lowercase();
        let query_norm = query_norm.trim();

        let mut best_entry = None;
        let mut best_score = 0.0f32;

        for entry in self.entries() {
            let question_norm = entry.question.to_lowercase();
            let question_norm = question_norm.trim();

            let mut score = sequence_ratio(query_norm, question_norm);

            let overlap = word_overlap(query_norm, question_norm);
            if overlap > 0.5 {
                score = score.max(overlap);
            }

            // Strictly greater: equal scores keep the first-seen entry
            if score > best_score {
                best_score = score;
                best_entry = Some(entry);
            }
        }

        match best_entry {
            Some(entry) if best_score >= threshold => MatchResult {
                entry: Some(entry.clone()),
                score: best_score,
            },
            _ => MatchResult::none(),
        }
    }
}

/// Character-level sequence-similarity ratio in [0, 1].
///
/// `2 * M / (|a| + |b|)` where `M` is the total size of the longest matching
/// blocks, found by recursively splitting around the longest common
/// substring. Identical strings score 1.0, disjoint strings 0.0.
pub fn sequence_ratio(a: &str, b: &str) -> f32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = total_match_size(&a, &b);
    2.0 * matched as f32 / total as f32
}

/// Total number of characters covered by matching blocks.
///
/// Finds the longest common block, then recurses into the unmatched regions
/// on either side of it.
fn total_match_size(a: &[char], b: &[char]) -> usize {
    let (a_start, b_start, size) = longest_match(a, b);
    if size == 0 {
        return 0;
    }

    size + total_match_size(&a[..a_start], &b[..b_start])
        + total_match_size(&a[a_start + size..], &b[b_start + size..])
}

/// Longest common contiguous block of `a` and `b`.
///
/// Returns `(start_in_a, start_in_b, length)`. Scanning is in ascending
/// index order with a strict improvement test, so the earliest maximal
/// block wins and the result is deterministic.
fn longest_match(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0usize, 0usize, 0usize);

    // lengths[j + 1] = length of the common suffix ending at a[i], b[j]
    let mut prev = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        let mut cur = vec![0usize; b.len() + 1];
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let len = prev[j] + 1;
                cur[j + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        prev = cur;
    }

    best
}

/// Fraction of the stored question's words that appear in the query.
fn word_overlap(query: &str, question: &str) -> f32 {
    let question_words: HashSet<&str> = question.split_whitespace().collect();
    if question_words.is_empty() {
        return 0.0;
    }

    let query_words: HashSet<&str> = query.split_whitespace().collect();
    let shared = question_words.intersection(&query_words).count();

    shared as f32 / question_words.len() as f32
}
