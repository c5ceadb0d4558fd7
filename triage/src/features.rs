//! Narrative feature building.
//!
//! Turns a raw narrative into the two base pieces the escalation scorer
//! consumes: the TF-IDF text vector and the scaled sentiment feature row.
//! Pure given a loaded artifact set — building twice for the same
//! narrative yields bit-identical output.

use tracing::debug;

use crate::artifacts::ArtifactSet;
use crate::error::{TriageError, TriageResult};
use crate::schema::SentimentFeatureRow;
use crate::{sentiment, text};

/// Builds base feature inputs from raw narratives.
pub struct FeatureBuilder<'a> {
    artifacts: &'a ArtifactSet,
}

impl<'a> FeatureBuilder<'a> {
    /// Create a builder over an already-loaded artifact set. Artifact
    /// failures surface at load time, never here.
    pub fn new(artifacts: &'a ArtifactSet) -> Self {
        Self { artifacts }
    }

    /// Build the text vector and scaled sentiment row for a narrative.
    ///
    /// Rejects empty or non-textual input before any feature work. The
    /// scaler is applied only to the word and sentence counts, with the
    /// parameters frozen at training time.
    pub fn build_base_features(
        &self,
        narrative: &str,
    ) -> TriageResult<(Vec<f64>, SentimentFeatureRow)> {
        validate_narrative(narrative)?;

        let mut row = sentiment::generate(narrative, &self.artifacts.lexicon);
        let scaled = self
            .artifacts
            .scaler
            .transform(&[row.word_num, row.sentence_num])?;
        row.word_num = scaled[0];
        row.sentence_num = scaled[1];

        let processed = text::preprocess(narrative, &self.artifacts.stopwords);
        let text_vector = self.artifacts.vectorizer.transform(&processed);

        debug!(
            tokens = processed.split_whitespace().count(),
            sentences = row.sentence_num,
            score_sum = row.corpus_score_sum,
            "Built base features"
        );
        Ok((text_vector, row))
    }
}

/// Reject narratives that cannot produce meaningful features.
pub fn validate_narrative(narrative: &str) -> TriageResult<()> {
    if narrative.trim().is_empty() {
        return Err(TriageError::Input("narrative is empty".into()));
    }
    if !text::has_text_content(narrative) {
        return Err(TriageError::Input(
            "narrative contains no alphabetic text".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinearModel, StandardScaler};
    use crate::schema::augmented_row_width;
    use crate::sentiment::SentimentLexicon;
    use crate::vectorize::TfidfVectorizer;
    use std::collections::{HashMap, HashSet};

    fn artifacts() -> ArtifactSet {
        let mut vocabulary = HashMap::new();
        vocabulary.insert("overdraft".to_string(), 0);
        vocabulary.insert("fee".to_string(), 1);
        vocabulary.insert("fees".to_string(), 2);
        vocabulary.insert("account".to_string(), 3);

        let mut terms = HashMap::new();
        terms.insert("charged".to_string(), -1.4);
        terms.insert("refused".to_string(), -1.8);

        let stopwords: HashSet<String> =
            ["the", "my", "to", "was", "i"].iter().map(|s| s.to_string()).collect();

        ArtifactSet {
            escalation_model: LinearModel {
                coefficients: vec![vec![0.0; 4 + augmented_row_width()]],
                intercepts: vec![0.0],
            },
            product_model: LinearModel {
                coefficients: vec![vec![0.0; 4], vec![0.0; 4]],
                intercepts: vec![0.0, 0.0],
            },
            vectorizer: TfidfVectorizer {
                vocabulary,
                idf: vec![1.0, 1.0, 1.0, 1.0],
            },
            scaler: StandardScaler {
                columns: vec!["word_num".into(), "sentence_num".into()],
                mean: vec![100.0, 5.0],
                scale: vec![50.0, 2.0],
            },
            product_labels: vec!["Bank account or service".into(), "Mortgage".into()],
            stopwords,
            lexicon: SentimentLexicon { terms },
        }
    }

    #[test]
    fn test_build_applies_frozen_scaler() {
        let set = artifacts();
        let builder = FeatureBuilder::new(&set);
        let narrative = "I was charged an overdraft fee on my account. They refused to refund it.";
        let (_, row) = builder.build_base_features(narrative).unwrap();

        // 14 words → (14 - 100) / 50; 2 sentences → (2 - 5) / 2.
        assert!((row.word_num - (14.0 - 100.0) / 50.0).abs() < 1e-12);
        assert!((row.sentence_num - (2.0 - 5.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_build_vectorizes_preprocessed_text() {
        let set = artifacts();
        let builder = FeatureBuilder::new(&set);
        let (vector, _) = builder
            .build_base_features("The overdraft fee was charged to my account")
            .unwrap();
        assert_eq!(vector.len(), 4);
        assert!(vector[0] > 0.0, "overdraft should be counted");
        assert!(vector[3] > 0.0, "account should be counted");
    }

    #[test]
    fn test_build_is_idempotent() {
        let set = artifacts();
        let builder = FeatureBuilder::new(&set);
        let narrative = "They charged overdraft fees twice! My account was never credited.";
        let first = builder.build_base_features(narrative).unwrap();
        let second = builder.build_base_features(narrative).unwrap();
        assert_eq!(first.0, second.0, "text vectors must be bit-identical");
        assert_eq!(first.1, second.1, "sentiment rows must be bit-identical");
    }

    #[test]
    fn test_empty_narrative_rejected() {
        let set = artifacts();
        let builder = FeatureBuilder::new(&set);
        let err = builder.build_base_features("   ").unwrap_err();
        assert!(matches!(err, TriageError::Input(_)));
    }

    #[test]
    fn test_non_text_narrative_rejected() {
        let set = artifacts();
        let builder = FeatureBuilder::new(&set);
        let err = builder.build_base_features("1234 ?!?! 5678").unwrap_err();
        assert!(matches!(err, TriageError::Input(_)));
    }
}
