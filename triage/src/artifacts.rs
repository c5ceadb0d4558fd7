//! Artifact loading and cross-validation.
//!
//! The trained classifiers, vectorizer, scaler, label enumeration, stop
//! words, and valence lexicon are loaded exactly once at startup into an
//! immutable [`ArtifactSet`]. Loading fails loudly: a missing file, a
//! parse failure, or an artifact whose shape disagrees with the rest of
//! the set aborts initialization instead of surfacing later as a silent
//! mis-scored prediction.

use std::collections::HashSet;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::TriageConfig;
use crate::error::{TriageError, TriageResult};
use crate::model::{LinearModel, StandardScaler};
use crate::schema::{augmented_row_width, ResponseType, SENTIMENT_COLUMNS};
use crate::sentiment::SentimentLexicon;
use crate::vectorize::TfidfVectorizer;

/// Columns the scaler must cover, in order.
const SCALED_COLUMNS: [&str; 2] = ["word_num", "sentence_num"];

/// Process-wide read-only model state, constructed once at startup.
///
/// Nothing mutates an `ArtifactSet` after load; it can be shared freely
/// (e.g. behind an `Arc`) across request handlers.
#[derive(Debug)]
pub struct ArtifactSet {
    /// Binary dispute/no-dispute classifier.
    pub escalation_model: LinearModel,
    /// Multi-class product classifier.
    pub product_model: LinearModel,
    /// Fitted TF-IDF vectorizer.
    pub vectorizer: TfidfVectorizer,
    /// Fitted scaler for word/sentence counts.
    pub scaler: StandardScaler,
    /// Product labels, positionally paired with the product model's
    /// output classes and validated against it at load time.
    pub product_labels: Vec<String>,
    /// Stop words used by text preprocessing.
    pub stopwords: HashSet<String>,
    /// Valence lexicon for sentiment metric generation.
    pub lexicon: SentimentLexicon,
}

impl ArtifactSet {
    /// Load and validate every artifact named by the configuration.
    pub fn load(config: &TriageConfig) -> TriageResult<Self> {
        info!(dir = %config.artifact_dir.display(), "Loading triage artifacts");

        let escalation_model: LinearModel =
            load_json(&config.artifact_path(&config.escalation_model_file))?;
        let product_model: LinearModel =
            load_json(&config.artifact_path(&config.product_model_file))?;
        let vectorizer: TfidfVectorizer = load_json(&config.artifact_path(&config.vectorizer_file))?;
        let scaler: StandardScaler = load_json(&config.artifact_path(&config.scaler_file))?;
        let product_labels: Vec<String> =
            load_json(&config.artifact_path(&config.product_labels_file))?;
        let lexicon: SentimentLexicon =
            load_json(&config.artifact_path(&config.sentiment_lexicon_file))?;
        let stopwords = load_stopwords(&config.artifact_path(&config.stopwords_file))?;

        let set = Self {
            escalation_model,
            product_model,
            vectorizer,
            scaler,
            product_labels,
            stopwords,
            lexicon,
        };
        set.validate()?;

        info!(
            vocabulary = set.vectorizer.dimension(),
            products = set.product_labels.len(),
            features = set.expected_feature_width(),
            "Artifact set loaded"
        );
        Ok(set)
    }

    /// Full escalation feature vector width: text vector plus augmented
    /// sentiment row.
    pub fn expected_feature_width(&self) -> usize {
        self.vectorizer.dimension() + augmented_row_width()
    }

    /// Cross-validate the artifact set. Per-artifact internal checks run
    /// first, then the shape agreements between artifacts.
    fn validate(&self) -> TriageResult<()> {
        self.escalation_model.validate()?;
        self.product_model.validate()?;
        self.vectorizer.validate()?;
        self.scaler.validate()?;

        if self.escalation_model.n_classes() != 2 {
            return Err(TriageError::ArtifactInvalid(format!(
                "escalation model has {} classes, expected binary",
                self.escalation_model.n_classes()
            )));
        }

        let expected = self.expected_feature_width();
        if self.escalation_model.n_features() != expected {
            return Err(TriageError::ArtifactInvalid(format!(
                "escalation model expects {} features but layout provides {} \
                 ({} text + {} sentiment + {} response indicators)",
                self.escalation_model.n_features(),
                expected,
                self.vectorizer.dimension(),
                SENTIMENT_COLUMNS.len(),
                ResponseType::COUNT
            )));
        }

        if self.product_model.n_features() != self.vectorizer.dimension() {
            return Err(TriageError::ArtifactInvalid(format!(
                "product model expects {} features but vectorizer produces {}",
                self.product_model.n_features(),
                self.vectorizer.dimension()
            )));
        }

        // Positional label pairing is only trustworthy if the lengths
        // agree; checked here once rather than trusted per call.
        if self.product_model.n_classes() != self.product_labels.len() {
            return Err(TriageError::ArtifactInvalid(format!(
                "product model discriminates {} classes but {} labels were loaded",
                self.product_model.n_classes(),
                self.product_labels.len()
            )));
        }

        let scaler_columns: Vec<&str> = self.scaler.columns.iter().map(String::as_str).collect();
        if scaler_columns != SCALED_COLUMNS {
            return Err(TriageError::ArtifactInvalid(format!(
                "scaler covers columns {:?}, expected {:?}",
                self.scaler.columns, SCALED_COLUMNS
            )));
        }

        Ok(())
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> TriageResult<T> {
    debug!(path = %path.display(), "Loading artifact");
    let raw = std::fs::read_to_string(path).map_err(|source| TriageError::ArtifactRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| TriageError::ArtifactParse {
        path: path.to_path_buf(),
        source,
    })
}

fn load_stopwords(path: &Path) -> TriageResult<HashSet<String>> {
    debug!(path = %path.display(), "Loading stop words");
    let raw = std::fs::read_to_string(path).map_err(|source| TriageError::ArtifactRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| l.to_lowercase())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn minimal_set(vocab_size: usize) -> ArtifactSet {
        let vocabulary: HashMap<String, usize> = (0..vocab_size)
            .map(|i| (format!("term{i}"), i))
            .collect();
        ArtifactSet {
            escalation_model: LinearModel {
                coefficients: vec![vec![0.0; vocab_size + augmented_row_width()]],
                intercepts: vec![0.0],
            },
            product_model: LinearModel {
                coefficients: vec![vec![0.0; vocab_size], vec![0.0; vocab_size], vec![0.0; vocab_size]],
                intercepts: vec![0.0; 3],
            },
            vectorizer: TfidfVectorizer {
                vocabulary,
                idf: vec![1.0; vocab_size],
            },
            scaler: StandardScaler {
                columns: vec!["word_num".into(), "sentence_num".into()],
                mean: vec![0.0, 0.0],
                scale: vec![1.0, 1.0],
            },
            product_labels: vec!["Credit card".into(), "Mortgage".into(), "Debt collection".into()],
            stopwords: HashSet::new(),
            lexicon: SentimentLexicon {
                terms: HashMap::new(),
            },
        }
    }

    #[test]
    fn test_consistent_set_validates() {
        let set = minimal_set(4);
        assert!(set.validate().is_ok());
        assert_eq!(set.expected_feature_width(), 4 + 14);
    }

    #[test]
    fn test_label_count_mismatch_fails_load_validation() {
        let mut set = minimal_set(4);
        set.product_labels.pop();
        let err = set.validate().unwrap_err();
        assert!(err.is_load_error());
    }

    #[test]
    fn test_wrong_escalation_width_fails_load_validation() {
        let mut set = minimal_set(4);
        set.escalation_model.coefficients = vec![vec![0.0; 7]];
        let err = set.validate().unwrap_err();
        assert!(err.is_load_error());
    }

    #[test]
    fn test_wrong_scaler_columns_fail_load_validation() {
        let mut set = minimal_set(4);
        set.scaler.columns = vec!["sentence_num".into(), "word_num".into()];
        set.scaler.mean = vec![0.0, 0.0];
        set.scaler.scale = vec![1.0, 1.0];
        let err = set.validate().unwrap_err();
        assert!(err.is_load_error());
    }

    #[test]
    fn test_missing_artifact_file_is_read_error() {
        let config = TriageConfig::with_artifact_dir("/nonexistent-artifact-dir");
        let err = ArtifactSet::load(&config).unwrap_err();
        assert!(matches!(err, TriageError::ArtifactRead { .. }));
    }

    #[test]
    fn test_stopword_file_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stopwords.txt");
        std::fs::write(&path, "# comment\nThe\n  and \n\nwith\n").unwrap();
        let words = load_stopwords(&path).unwrap();
        assert_eq!(words.len(), 3);
        assert!(words.contains("the"));
        assert!(words.contains("with"));
    }
}
