//! Escalation scoring across the response-type enumeration.
//!
//! For each candidate company response, assembles the full feature vector
//! and asks the escalation classifier for the dispute probability. Either
//! every response type is scored or the whole operation fails — a partial
//! probability vector is never returned.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TriageError, TriageResult};
use crate::model::LinearModel;
use crate::schema::{augment_with_response, ResponseType, SentimentFeatureRow};

/// Dispute probability per response type, complete by construction:
/// exactly one entry per response type, in canonical order.
/// Deserialization goes through [`EscalationProbabilities::from_entries`],
/// so a short, reordered, or out-of-range vector never gets in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<(ResponseType, f64)>",
    into = "Vec<(ResponseType, f64)>"
)]
pub struct EscalationProbabilities {
    entries: Vec<(ResponseType, f64)>,
}

impl TryFrom<Vec<(ResponseType, f64)>> for EscalationProbabilities {
    type Error = TriageError;

    fn try_from(entries: Vec<(ResponseType, f64)>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<EscalationProbabilities> for Vec<(ResponseType, f64)> {
    fn from(probabilities: EscalationProbabilities) -> Self {
        probabilities.entries
    }
}

impl EscalationProbabilities {
    /// Build from per-type entries, enforcing completeness: one entry per
    /// response type in canonical order, every value in [0, 1].
    pub fn from_entries(entries: Vec<(ResponseType, f64)>) -> TriageResult<Self> {
        if entries.len() != ResponseType::COUNT {
            return Err(TriageError::Scoring(format!(
                "expected {} probabilities, got {}",
                ResponseType::COUNT,
                entries.len()
            )));
        }
        for ((response, p), expected) in entries.iter().zip(ResponseType::ordered()) {
            if response != expected {
                return Err(TriageError::Scoring(format!(
                    "probabilities out of canonical order: found {response}, expected {expected}"
                )));
            }
            if !p.is_finite() || !(0.0..=1.0).contains(p) {
                return Err(TriageError::Scoring(format!(
                    "probability for {response} is {p}, outside [0, 1]"
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Probability for one response type.
    pub fn get(&self, response: ResponseType) -> f64 {
        self.entries[response.one_hot_index()].1
    }

    /// Entries in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (ResponseType, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Response type with the lowest probability; first occurrence wins
    /// on exact ties.
    pub fn arg_min(&self) -> (ResponseType, f64) {
        let mut best = self.entries[0];
        for entry in &self.entries[1..] {
            if entry.1 < best.1 {
                best = *entry;
            }
        }
        best
    }
}

/// Scores escalation risk for every candidate response type.
pub struct EscalationScorer<'a> {
    model: &'a LinearModel,
}

impl<'a> EscalationScorer<'a> {
    /// Create a scorer over the loaded escalation classifier.
    pub fn new(model: &'a LinearModel) -> Self {
        Self { model }
    }

    /// Score every response type for one narrative's base features.
    ///
    /// Each iteration builds a fresh augmented row, so no one-hot state
    /// leaks between response types. Classifier class index 1 is the
    /// positive (disputed) class.
    pub fn score_all(
        &self,
        text_vector: &[f64],
        base_row: &SentimentFeatureRow,
    ) -> TriageResult<EscalationProbabilities> {
        let mut entries = Vec::with_capacity(ResponseType::COUNT);
        for response in ResponseType::ordered() {
            let augmented = augment_with_response(base_row, *response);

            let mut features = Vec::with_capacity(text_vector.len() + augmented.len());
            features.extend_from_slice(text_vector);
            features.extend_from_slice(&augmented);

            let probabilities = self.model.predict_proba(&features)?;
            let dispute = probabilities.get(1).copied().ok_or_else(|| {
                TriageError::Scoring(format!(
                    "classifier returned {} classes for {response}, expected 2",
                    probabilities.len()
                ))
            })?;

            debug!(response = %response, probability = dispute, "Scored response type");
            entries.push((*response, dispute));
        }
        EscalationProbabilities::from_entries(entries)
    }
}
