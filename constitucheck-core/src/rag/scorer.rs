//! Lexical relevance scoring.
//!
//! A bag-of-words heuristic: the score of a document is the fraction of the
//! query's tokens (repeats included) that occur anywhere in the document.
//! No embeddings and no external calls; every function here is pure.

use super::types::{Document, ScoredResult};
use std::collections::HashSet;

/// ASCII letters, digits and `_`. Other characters, accented letters
/// included, separate tokens.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splits text into lowercase word tokens.
///
/// Anything that is not a word character acts as a separator, so punctuation
/// never glues two words together. Order is preserved and duplicates are kept.
pub fn normalize(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Scores how well `content` covers `query`.
///
/// Returns `matches / query_tokens` where `matches` counts every query token
/// (including repeats) present in the content's token set. The score is
/// directed: the denominator is always the query's token count.
///
/// # Example
///
/// ```
/// use constitucheck_core::rag::score;
///
/// assert_eq!(score("law law", "law and order"), 1.0);
/// assert_eq!(score("privacy law", "privacy"), 0.5);
/// assert_eq!(score("", "anything"), 0.0);
/// ```
pub fn score(query: &str, content: &str) -> f64 {
    if query.is_empty() || content.is_empty() {
        return 0.0;
    }

    let content_tokens = normalize(content);
    let content_set: HashSet<&str> = content_tokens.iter().map(String::as_str).collect();
    let query_tokens = normalize(query);

    if query_tokens.is_empty() {
        return 0.0;
    }

    let matches = query_tokens
        .iter()
        .filter(|token| content_set.contains(token.as_str()))
        .count();

    matches as f64 / query_tokens.len() as f64
}

/// Ranks `corpus` against `query` and keeps the best `k` documents.
///
/// Every document's `content` is scored, results are sorted by descending
/// score with ties left in corpus order, and at most `k` are returned. The
/// corpus is only borrowed; returned results hold their own copies.
pub fn rank_top_k(query: &str, corpus: &[Document], k: usize) -> Vec<ScoredResult> {
    let mut ranked: Vec<ScoredResult> = corpus
        .iter()
        .map(|document| ScoredResult {
            score: score(query, &document.content),
            document: document.clone(),
        })
        .collect();

    // `sort_by` is stable, which keeps equal scores in corpus order.
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(k);
    ranked
}
