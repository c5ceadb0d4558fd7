//! Narrative text preprocessing ahead of TF-IDF vectorization.
//!
//! Mirrors the training-time normalization: lowercase, alphabetic tokens
//! only, CFPB redaction masks (`XXXX`) stripped, stop words removed. The
//! stop-word list itself is an artifact loaded at startup so inference
//! uses exactly the list the vocabulary was fitted with.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]+").expect("static token pattern"));

/// Whether a token is a CFPB redaction mask ("xx", "xxxx", ...).
fn is_redaction_mask(token: &str) -> bool {
    token.len() >= 2 && token.chars().all(|c| c == 'x')
}

/// Normalize a raw narrative for the fitted vectorizer.
///
/// Produces a whitespace-joined token stream; tokens are lowercase
/// alphabetic runs with masks, single characters, and stop words removed.
pub fn preprocess(narrative: &str, stopwords: &HashSet<String>) -> String {
    let lowered = narrative.to_lowercase();
    let tokens: Vec<&str> = WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| t.len() > 1)
        .filter(|t| !is_redaction_mask(t))
        .filter(|t| !stopwords.contains(*t))
        .collect();
    tokens.join(" ")
}

/// Whether the narrative carries any usable text at all.
///
/// Used for input rejection before feature extraction: a narrative with
/// no alphabetic content cannot produce meaningful features.
pub fn has_text_content(narrative: &str) -> bool {
    narrative.chars().any(|c| c.is_alphabetic())
}
