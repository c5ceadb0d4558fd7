//! Fitted-model adapters: linear classifier heads and the numeric scaler.
//!
//! Training happens elsewhere; this module only applies frozen parameters.
//! A `LinearModel` carries logistic-regression coefficients loaded from an
//! artifact and exposes the `predict_proba` contract the pipeline consumes.
//! Dimensionality is checked on every call — a width mismatch means the
//! feature layout has drifted from the trained model and is never papered
//! over.

use serde::{Deserialize, Serialize};

use crate::error::{TriageError, TriageResult};

/// Logistic-regression classifier with frozen weights.
///
/// Binary heads store a single coefficient row and report
/// `[p_negative, p_positive]`; multi-class heads store one row per class
/// and report a normalized probability per class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    /// One coefficient row per class (single row for binary heads).
    pub coefficients: Vec<Vec<f64>>,
    /// One intercept per coefficient row.
    pub intercepts: Vec<f64>,
}

impl LinearModel {
    /// Expected input vector width.
    pub fn n_features(&self) -> usize {
        self.coefficients.first().map(|row| row.len()).unwrap_or(0)
    }

    /// Number of classes this model discriminates between.
    pub fn n_classes(&self) -> usize {
        if self.coefficients.len() == 1 {
            2
        } else {
            self.coefficients.len()
        }
    }

    /// Validate internal consistency after deserialization.
    pub fn validate(&self) -> TriageResult<()> {
        if self.coefficients.is_empty() {
            return Err(TriageError::ArtifactInvalid(
                "linear model has no coefficient rows".into(),
            ));
        }
        if self.intercepts.len() != self.coefficients.len() {
            return Err(TriageError::ArtifactInvalid(format!(
                "linear model has {} coefficient rows but {} intercepts",
                self.coefficients.len(),
                self.intercepts.len()
            )));
        }
        let width = self.coefficients[0].len();
        if width == 0 {
            return Err(TriageError::ArtifactInvalid(
                "linear model has zero-width coefficient rows".into(),
            ));
        }
        if let Some(bad) = self.coefficients.iter().find(|row| row.len() != width) {
            return Err(TriageError::ArtifactInvalid(format!(
                "ragged coefficient rows: expected width {}, found {}",
                width,
                bad.len()
            )));
        }
        Ok(())
    }

    /// Per-class probabilities for one feature vector.
    pub fn predict_proba(&self, features: &[f64]) -> TriageResult<Vec<f64>> {
        if features.len() != self.n_features() {
            return Err(TriageError::SchemaMismatch(format!(
                "feature vector has {} columns, model expects {}",
                features.len(),
                self.n_features()
            )));
        }

        let decisions: Vec<f64> = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| dot(row, features) + intercept)
            .collect();

        let probabilities = if decisions.len() == 1 {
            let p = sigmoid(decisions[0]);
            vec![1.0 - p, p]
        } else {
            softmax(&decisions)
        };

        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(TriageError::Scoring(
                "classifier produced a non-finite probability".into(),
            ));
        }
        Ok(probabilities)
    }
}

/// Standard scaler with frozen mean and scale for a named column subset.
///
/// At training time only `word_num` and `sentence_num` were scaled; the
/// column names travel with the artifact so the load step can verify the
/// subset instead of trusting positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Names of the columns this scaler applies to, in order.
    pub columns: Vec<String>,
    /// Per-column mean frozen at fit time.
    pub mean: Vec<f64>,
    /// Per-column standard deviation frozen at fit time.
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Validate internal consistency after deserialization.
    pub fn validate(&self) -> TriageResult<()> {
        if self.mean.len() != self.columns.len() || self.scale.len() != self.columns.len() {
            return Err(TriageError::ArtifactInvalid(format!(
                "scaler has {} columns, {} means, {} scales",
                self.columns.len(),
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            return Err(TriageError::ArtifactInvalid(
                "scaler has a zero or non-finite scale entry".into(),
            ));
        }
        Ok(())
    }

    /// Apply the frozen transform to values in column order. Never refits.
    pub fn transform(&self, values: &[f64]) -> TriageResult<Vec<f64>> {
        if values.len() != self.columns.len() {
            return Err(TriageError::SchemaMismatch(format!(
                "scaler expects {} values ({}), got {}",
                self.columns.len(),
                self.columns.join(", "),
                values.len()
            )));
        }
        Ok(values
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(v, (m, s))| (v - m) / s)
            .collect())
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(decisions: &[f64]) -> Vec<f64> {
    // Shift by the max for numerical stability before exponentiating.
    let max = decisions.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = decisions.iter().map(|d| (d - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|e| e / total).collect()
}
