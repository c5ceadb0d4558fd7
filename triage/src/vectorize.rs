//! Fitted TF-IDF transform.
//!
//! Vocabulary construction and idf fitting are training-time concerns and
//! never happen here. This adapter applies a frozen vocabulary and idf
//! weight table to preprocessed text, reproducing the training-time
//! transform: raw term counts, idf weighting, l2 normalization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{TriageError, TriageResult};

/// A fitted TF-IDF vectorizer loaded from an artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Term → column index, frozen at fit time.
    pub vocabulary: HashMap<String, usize>,
    /// Per-column idf weight; its length is the output dimensionality.
    pub idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Output vector width.
    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    /// Validate internal consistency after deserialization.
    pub fn validate(&self) -> TriageResult<()> {
        if self.idf.is_empty() {
            return Err(TriageError::ArtifactInvalid(
                "vectorizer has an empty idf table".into(),
            ));
        }
        if let Some((term, index)) = self
            .vocabulary
            .iter()
            .find(|(_, index)| **index >= self.idf.len())
        {
            return Err(TriageError::ArtifactInvalid(format!(
                "vocabulary term '{}' maps to column {} but idf table has {} entries",
                term,
                index,
                self.idf.len()
            )));
        }
        Ok(())
    }

    /// Transform preprocessed text into a dense TF-IDF vector.
    ///
    /// Tokens outside the fitted vocabulary are ignored, matching the
    /// training-time transform. The result is l2-normalized unless every
    /// component is zero.
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.dimension()];
        for token in text.split_whitespace() {
            if let Some(&index) = self.vocabulary.get(token) {
                vector[index] += 1.0;
            }
        }
        for (value, idf) in vector.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}
