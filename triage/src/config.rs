//! Triage configuration: artifact locations and policy constants.
//!
//! Defaults mirror the shipped artifact layout and can be overridden via
//! environment variables or a TOML file. The recommendation thresholds are
//! hand-tuned business rules; they live here as configuration rather than
//! as literals buried in the policy code.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{TriageError, TriageResult};

/// Constants for the response recommendation policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Escalation-risk cutoff. Responses scoring at or above this are
    /// considered unsafe to recommend.
    pub escalation_threshold: f64,
    /// Margin subtracted from the threshold to form the preferred
    /// ceiling for the cost-aware override.
    pub preferred_margin: f64,
}

impl PolicyConfig {
    /// The ceiling a probability must stay strictly under to qualify for
    /// the cost-aware override.
    pub fn preferred_ceiling(&self) -> f64 {
        self.escalation_threshold - self.preferred_margin
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            escalation_threshold: env_f64("TRIAGE_ESCALATION_THRESHOLD", 0.5),
            preferred_margin: env_f64("TRIAGE_PREFERRED_MARGIN", 0.15),
        }
    }
}

/// Top-level triage configuration. Fields omitted from a TOML file
/// fall back to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// Directory holding all serialized artifacts.
    pub artifact_dir: PathBuf,
    /// Escalation classifier artifact file name.
    pub escalation_model_file: String,
    /// Product classifier artifact file name.
    pub product_model_file: String,
    /// Fitted TF-IDF vectorizer artifact file name.
    pub vectorizer_file: String,
    /// Fitted scaler artifact file name.
    pub scaler_file: String,
    /// Product label enumeration file name (JSON list of strings).
    pub product_labels_file: String,
    /// Stop-word list file name (one word per line).
    pub stopwords_file: String,
    /// Valence lexicon artifact file name.
    pub sentiment_lexicon_file: String,
    /// Recommendation policy constants.
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            artifact_dir: std::env::var("TRIAGE_ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("trained_models")),
            escalation_model_file: "escalation_model.json".into(),
            product_model_file: "product_model.json".into(),
            vectorizer_file: "tfidf_vectorizer.json".into(),
            scaler_file: "scaler.json".into(),
            product_labels_file: "product_labels.json".into(),
            stopwords_file: "stopwords.txt".into(),
            sentiment_lexicon_file: "sentiment_lexicon.json".into(),
            policy: PolicyConfig::default(),
        }
    }
}

impl TriageConfig {
    /// Configuration rooted at a specific artifact directory, with all
    /// other fields at their defaults.
    pub fn with_artifact_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            artifact_dir: dir.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> TriageResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| TriageError::ArtifactRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|e| {
            TriageError::ArtifactInvalid(format!("config {}: {}", path.display(), e))
        })
    }

    /// Full path of an artifact file within the artifact directory.
    pub fn artifact_path(&self, file_name: &str) -> PathBuf {
        self.artifact_dir.join(file_name)
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_constants() {
        let policy = PolicyConfig {
            escalation_threshold: 0.5,
            preferred_margin: 0.15,
        };
        assert!((policy.preferred_ceiling() - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_artifact_path_joins_dir() {
        let config = TriageConfig::with_artifact_dir("/opt/models");
        assert_eq!(
            config.artifact_path(&config.scaler_file),
            PathBuf::from("/opt/models/scaler.json")
        );
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let config = TriageConfig::with_artifact_dir("models");
        let raw = toml::to_string(&config).unwrap();
        let parsed: TriageConfig = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.artifact_dir, config.artifact_dir);
        assert_eq!(parsed.vectorizer_file, config.vectorizer_file);
    }

    #[test]
    fn test_from_toml_file_missing_is_load_error() {
        let err = TriageConfig::from_toml_file(Path::new("/nonexistent/triage.toml")).unwrap_err();
        assert!(err.is_load_error());
    }
}
