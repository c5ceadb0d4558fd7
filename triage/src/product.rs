//! Product category classification.
//!
//! Wraps the multi-class product classifier: arg-max over its per-class
//! probabilities, mapped through the loaded label enumeration. The
//! index → label pairing is positional, which is why the artifact loader
//! verifies the lengths agree; the per-call check here guards against
//! drift after load.

use tracing::debug;

use crate::error::{TriageError, TriageResult};
use crate::model::LinearModel;

/// Adapter pairing the product classifier with its label enumeration.
pub struct ProductClassifier<'a> {
    model: &'a LinearModel,
    labels: &'a [String],
}

impl<'a> ProductClassifier<'a> {
    /// Create an adapter; the artifact loader has already validated that
    /// `labels` and the model's class count agree.
    pub fn new(model: &'a LinearModel, labels: &'a [String]) -> Self {
        Self { model, labels }
    }

    /// Most probable product category for a vectorized narrative.
    pub fn classify(&self, text_vector: &[f64]) -> TriageResult<&'a str> {
        let probabilities = self.model.predict_proba(text_vector)?;
        if probabilities.len() != self.labels.len() {
            return Err(TriageError::Scoring(format!(
                "product classifier returned {} probabilities for {} labels",
                probabilities.len(),
                self.labels.len()
            )));
        }

        let (index, probability) = probabilities
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .ok_or_else(|| TriageError::Scoring("product classifier returned no output".into()))?;

        let label = &self.labels[index];
        debug!(product = %label, probability, "Classified product category");
        Ok(label)
    }
}
