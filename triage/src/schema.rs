//! Canonical feature schema — the single source of truth for column layout.
//!
//! The escalation classifier was trained against a fixed column ordering:
//! eight sentiment/linguistic columns followed by one indicator column per
//! company response type, in the order produced by the training-time dummy
//! encoding (alphabetical by label). Every feature row and one-hot block
//! built at inference time must go through this module; any drift between
//! this layout and the trained model is a contract violation, not a
//! recoverable condition.

use serde::{Deserialize, Serialize};

use crate::error::{TriageError, TriageResult};

/// Canonical ordered sentiment/linguistic column names.
///
/// The misspelled `num_of_exclaimation_mark` is the serialized column name
/// the model was trained with and must not be corrected here.
pub const SENTIMENT_COLUMNS: [&str; 8] = [
    "corpus_score_sum",
    "corpus_score_ave",
    "negative_ratio",
    "most_negative_score",
    "word_num",
    "sentence_num",
    "num_of_question_mark",
    "num_of_exclaimation_mark",
];

/// Prefix for the one-hot response indicator columns.
pub const RESPONSE_COLUMN_PREFIX: &str = "company_response_";

/// Company response strategies, in canonical (training-time) column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseType {
    /// "Closed"
    #[serde(rename = "Closed")]
    Closed,
    /// "Closed with explanation"
    #[serde(rename = "Closed with explanation")]
    ClosedWithExplanation,
    /// "Closed with monetary relief"
    #[serde(rename = "Closed with monetary relief")]
    ClosedWithMonetaryRelief,
    /// "Closed with non-monetary relief"
    #[serde(rename = "Closed with non-monetary relief")]
    ClosedWithNonMonetaryRelief,
    /// "Closed without relief"
    #[serde(rename = "Closed without relief")]
    ClosedWithoutRelief,
    /// "Untimely response"
    #[serde(rename = "Untimely response")]
    UntimelyResponse,
}

impl ResponseType {
    /// Number of response types (width of the one-hot block).
    pub const COUNT: usize = 6;

    /// All response types in canonical order. One-hot column identity
    /// depends on this ordering; display order happens to match.
    pub fn ordered() -> &'static [ResponseType; Self::COUNT] {
        &[
            Self::Closed,
            Self::ClosedWithExplanation,
            Self::ClosedWithMonetaryRelief,
            Self::ClosedWithNonMonetaryRelief,
            Self::ClosedWithoutRelief,
            Self::UntimelyResponse,
        ]
    }

    /// Human-readable dataset label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Closed => "Closed",
            Self::ClosedWithExplanation => "Closed with explanation",
            Self::ClosedWithMonetaryRelief => "Closed with monetary relief",
            Self::ClosedWithNonMonetaryRelief => "Closed with non-monetary relief",
            Self::ClosedWithoutRelief => "Closed without relief",
            Self::UntimelyResponse => "Untimely response",
        }
    }

    /// Position of this response type's indicator column within the
    /// one-hot block. Must agree with [`ResponseType::ordered`].
    pub fn one_hot_index(self) -> usize {
        match self {
            Self::Closed => 0,
            Self::ClosedWithExplanation => 1,
            Self::ClosedWithMonetaryRelief => 2,
            Self::ClosedWithNonMonetaryRelief => 3,
            Self::ClosedWithoutRelief => 4,
            Self::UntimelyResponse => 5,
        }
    }

    /// Name of the indicator column, e.g. `company_response_Closed`.
    pub fn one_hot_column(self) -> String {
        format!("{}{}", RESPONSE_COLUMN_PREFIX, self.label())
    }
}

impl std::fmt::Display for ResponseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One sentiment/linguistic feature row, raw or scaled.
///
/// Statically laid out — one field per entry of [`SENTIMENT_COLUMNS`], in
/// the same order. There is deliberately no map-backed constructor that
/// would let runtime key ordering decide column positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentFeatureRow {
    /// Sum of per-sentence sentiment scores.
    pub corpus_score_sum: f64,
    /// Mean of per-sentence sentiment scores.
    pub corpus_score_ave: f64,
    /// Fraction of sentences scoring negative.
    pub negative_ratio: f64,
    /// Most negative single-sentence score.
    pub most_negative_score: f64,
    /// Word count (scaled at training time).
    pub word_num: f64,
    /// Sentence count (scaled at training time).
    pub sentence_num: f64,
    /// Question mark count.
    pub num_of_question_mark: f64,
    /// Exclamation mark count (column name keeps the training-time spelling).
    pub num_of_exclaimation_mark: f64,
}

impl SentimentFeatureRow {
    /// Values in canonical column order.
    pub fn to_vec(self) -> Vec<f64> {
        vec![
            self.corpus_score_sum,
            self.corpus_score_ave,
            self.negative_ratio,
            self.most_negative_score,
            self.word_num,
            self.sentence_num,
            self.num_of_question_mark,
            self.num_of_exclaimation_mark,
        ]
    }

    /// Build a row from named values, validating names and order against
    /// the canonical schema. Missing, extra, or reordered columns fail
    /// with a schema mismatch rather than being silently fixed up.
    pub fn from_named(columns: &[(&str, f64)]) -> TriageResult<Self> {
        if columns.len() != SENTIMENT_COLUMNS.len() {
            return Err(TriageError::SchemaMismatch(format!(
                "expected {} sentiment columns, got {}",
                SENTIMENT_COLUMNS.len(),
                columns.len()
            )));
        }
        for (i, (name, _)) in columns.iter().enumerate() {
            if *name != SENTIMENT_COLUMNS[i] {
                return Err(TriageError::SchemaMismatch(format!(
                    "column {} is '{}', expected '{}'",
                    i, name, SENTIMENT_COLUMNS[i]
                )));
            }
        }
        let v: Vec<f64> = columns.iter().map(|(_, value)| *value).collect();
        Ok(Self {
            corpus_score_sum: v[0],
            corpus_score_ave: v[1],
            negative_ratio: v[2],
            most_negative_score: v[3],
            word_num: v[4],
            sentence_num: v[5],
            num_of_question_mark: v[6],
            num_of_exclaimation_mark: v[7],
        })
    }
}

/// Width of an augmented sentiment row: sentiment columns plus the
/// one-hot response block.
pub const fn augmented_row_width() -> usize {
    SENTIMENT_COLUMNS.len() + ResponseType::COUNT
}

/// Encode a response choice into an augmented feature row.
///
/// Returns a freshly allocated row — sentiment columns in canonical order
/// followed by the one-hot block with exactly one bit set. The original
/// pipeline mutated a single shared row across the response loop; building
/// a new row per call removes that contamination hazard structurally
/// instead of relying on a reset convention.
pub fn augment_with_response(row: &SentimentFeatureRow, response: ResponseType) -> Vec<f64> {
    let mut out = row.to_vec();
    let mut one_hot = [0.0; ResponseType::COUNT];
    one_hot[response.one_hot_index()] = 1.0;
    out.extend_from_slice(&one_hot);
    out
}
