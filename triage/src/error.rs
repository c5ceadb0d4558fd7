//! Structured error types for the triage pipeline.
//!
//! One domain error enum instead of `anyhow` so consumers can match on
//! specific failure classes: artifact load failures are fatal at startup,
//! schema mismatches and scoring failures are fatal per request, and input
//! rejections happen before any feature extraction. None of these are
//! retried — given fixed artifacts they are deterministic, not transient.

use std::path::PathBuf;

/// Errors from the triage pipeline.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    /// Failed to read an artifact file from disk at startup.
    #[error("Failed to read artifact {path}: {source}")]
    ArtifactRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse a serialized artifact.
    #[error("Failed to parse artifact {path}: {source}")]
    ArtifactParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// An artifact loaded but its shape is incompatible with the rest of
    /// the artifact set (wrong dimensionality, label count, column names).
    #[error("Artifact validation failed: {0}")]
    ArtifactInvalid(String),

    /// A feature row or assembled vector does not match the canonical
    /// training-time layout. Never silently truncated or reordered.
    #[error("Feature schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Classifier invocation failed while scoring a response type. The
    /// whole prediction fails; no partial probability vector is surfaced.
    #[error("Escalation scoring failed: {0}")]
    Scoring(String),

    /// The narrative was rejected before feature extraction.
    #[error("Invalid narrative: {0}")]
    Input(String),

    /// Chart rendering failed. Presentational only — callers may treat
    /// this as non-fatal for the prediction itself.
    #[error("Failed to write chart {path}: {source}")]
    Chart {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for triage operations.
pub type TriageResult<T> = Result<T, TriageError>;

impl TriageError {
    /// Whether this error class indicates a broken artifact set (fatal at
    /// startup) as opposed to a per-request failure.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::ArtifactRead { .. } | Self::ArtifactParse { .. } | Self::ArtifactInvalid(_)
        )
    }
}
