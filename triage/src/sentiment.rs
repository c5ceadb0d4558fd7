//! Sentiment and linguistic metric generation.
//!
//! Produces the raw (unscaled) sentiment feature row for a narrative.
//! Scoring is lexicon-based: each sentence is scored from a valence
//! lexicon loaded with the artifact set, normalized into [-1, 1]. The
//! lexicon's construction is a training-time concern; here it is only
//! applied.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::schema::SentimentFeatureRow;

/// Normalization constant for sentence scores, mapping an unbounded
/// valence sum into [-1, 1] (the same curve the training lexicon used).
const SCORE_NORMALIZATION_ALPHA: f64 = 15.0;

static SENTENCE_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("static sentence pattern"));
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z']+").expect("static token pattern"));

/// Valence lexicon loaded from an artifact: term → signed strength.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentLexicon {
    /// Term valences; negative values mark negative sentiment.
    pub terms: HashMap<String, f64>,
}

impl SentimentLexicon {
    /// Score one sentence in [-1, 1]. Sentences with no lexicon hits
    /// score 0.
    pub fn score_sentence(&self, sentence: &str) -> f64 {
        let lowered = sentence.to_lowercase();
        let valence_sum: f64 = TOKEN_RE
            .find_iter(&lowered)
            .filter_map(|m| self.terms.get(m.as_str()))
            .sum();
        if valence_sum == 0.0 {
            return 0.0;
        }
        valence_sum / (valence_sum * valence_sum + SCORE_NORMALIZATION_ALPHA).sqrt()
    }
}

/// Generate the raw sentiment feature row for a narrative.
///
/// Column semantics match the training data exactly: per-sentence score
/// sum and mean, fraction of negative sentences, most negative single
/// score, word and sentence counts, question and exclamation mark counts.
/// Word and sentence counts are returned unscaled; the caller applies the
/// fitted scaler.
pub fn generate(narrative: &str, lexicon: &SentimentLexicon) -> SentimentFeatureRow {
    let sentences: Vec<&str> = SENTENCE_SPLIT_RE
        .split(narrative)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let scores: Vec<f64> = sentences
        .iter()
        .map(|s| lexicon.score_sentence(s))
        .collect();

    let sentence_num = sentences.len().max(1) as f64;
    let corpus_score_sum: f64 = scores.iter().sum();
    let negative_count = scores.iter().filter(|s| **s < 0.0).count() as f64;
    let most_negative_score = scores.iter().cloned().fold(0.0_f64, f64::min);

    SentimentFeatureRow {
        corpus_score_sum,
        corpus_score_ave: corpus_score_sum / sentence_num,
        negative_ratio: negative_count / sentence_num,
        most_negative_score,
        word_num: narrative.split_whitespace().count() as f64,
        sentence_num: sentences.len() as f64,
        num_of_question_mark: narrative.matches('?').count() as f64,
        num_of_exclaimation_mark: narrative.matches('!').count() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> SentimentLexicon {
        let terms = [
            ("angry", -2.2),
            ("charged", -1.1),
            ("refused", -1.8),
            ("resolved", 1.6),
            ("helpful", 1.9),
        ]
        .iter()
        .map(|(t, v)| (t.to_string(), *v))
        .collect();
        SentimentLexicon { terms }
    }

    #[test]
    fn test_sentence_score_is_bounded() {
        let lex = lexicon();
        let score = lex.score_sentence("angry angry refused charged");
        assert!(score > -1.0 && score < 0.0);

        let positive = lex.score_sentence("helpful and resolved");
        assert!(positive > 0.0 && positive < 1.0);
    }

    #[test]
    fn test_unknown_words_score_zero() {
        let lex = lexicon();
        assert_eq!(lex.score_sentence("completely neutral statement"), 0.0);
    }

    #[test]
    fn test_generate_counts() {
        let lex = lexicon();
        let narrative = "They charged me twice! Why was nobody helpful? It is resolved now.";
        let row = generate(narrative, &lex);

        assert_eq!(row.sentence_num, 3.0);
        assert_eq!(row.word_num, 12.0);
        assert_eq!(row.num_of_question_mark, 1.0);
        assert_eq!(row.num_of_exclaimation_mark, 1.0);
    }

    #[test]
    fn test_negative_ratio_and_most_negative() {
        let lex = lexicon();
        let narrative = "They refused to help. The agent was helpful.";
        let row = generate(narrative, &lex);

        assert!((row.negative_ratio - 0.5).abs() < 1e-12);
        assert!(row.most_negative_score < 0.0);
        assert_eq!(row.most_negative_score, lex.score_sentence("They refused to help"));
    }

    #[test]
    fn test_generate_handles_no_sentence_terminator() {
        let lex = lexicon();
        let row = generate("charged twice with no punctuation", &lex);
        assert_eq!(row.sentence_num, 1.0);
        assert!(row.corpus_score_sum < 0.0);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let lex = lexicon();
        let narrative = "They charged me twice! It was never resolved.";
        assert_eq!(generate(narrative, &lex), generate(narrative, &lex));
    }
}
