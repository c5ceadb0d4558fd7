//! Prediction facade: one narrative in, one triage result out.
//!
//! Owns the immutable artifact set and the recommendation policy and
//! orchestrates the full pipeline: input validation → base features →
//! product classification → per-response escalation scoring →
//! recommendation. Every call allocates its own buffers; the predictor
//! itself is read-only after construction and safe to share.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::artifacts::ArtifactSet;
use crate::config::{PolicyConfig, TriageConfig};
use crate::error::TriageResult;
use crate::features::FeatureBuilder;
use crate::policy::RecommendationPolicy;
use crate::product::ProductClassifier;
use crate::schema::ResponseType;
use crate::scorer::{EscalationProbabilities, EscalationScorer};

/// Result of triaging one narrative. Created fresh per call and not
/// persisted anywhere by this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted product category of the complaint.
    pub product: String,
    /// Dispute probability per candidate response type.
    pub probabilities: EscalationProbabilities,
    /// Recommended company response.
    pub recommended: ResponseType,
    /// When the prediction was made.
    pub predicted_at: DateTime<Utc>,
}

/// The triage predictor: loaded artifacts plus the recommendation policy.
pub struct Predictor {
    artifacts: ArtifactSet,
    policy: RecommendationPolicy,
}

impl Predictor {
    /// Build a predictor over an already-loaded artifact set.
    pub fn new(artifacts: ArtifactSet, policy_config: PolicyConfig) -> Self {
        Self {
            artifacts,
            policy: RecommendationPolicy::new(policy_config),
        }
    }

    /// Load artifacts per the configuration and build a predictor.
    /// Any artifact problem fails here, once, instead of per request.
    pub fn from_config(config: &TriageConfig) -> TriageResult<Self> {
        let artifacts = ArtifactSet::load(config)?;
        Ok(Self::new(artifacts, config.policy))
    }

    /// The loaded artifact set (read-only).
    pub fn artifacts(&self) -> &ArtifactSet {
        &self.artifacts
    }

    /// Triage one narrative.
    pub fn predict(&self, narrative: &str) -> TriageResult<PredictionResult> {
        let builder = FeatureBuilder::new(&self.artifacts);
        let (text_vector, base_row) = builder.build_base_features(narrative)?;

        let product = ProductClassifier::new(
            &self.artifacts.product_model,
            &self.artifacts.product_labels,
        )
        .classify(&text_vector)?
        .to_string();

        let probabilities = EscalationScorer::new(&self.artifacts.escalation_model)
            .score_all(&text_vector, &base_row)?;
        let recommended = self.policy.recommend(&probabilities);

        info!(
            product = %product,
            recommended = %recommended,
            risk = probabilities.get(recommended),
            "Triage complete"
        );

        Ok(PredictionResult {
            product,
            probabilities,
            recommended,
            predicted_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinearModel, StandardScaler};
    use crate::schema::{augmented_row_width, SENTIMENT_COLUMNS};
    use crate::sentiment::SentimentLexicon;
    use crate::vectorize::TfidfVectorizer;
    use std::collections::{HashMap, HashSet};

    /// Artifact set with a response-keyed escalation model: text and
    /// sentiment coefficients are zero, so each response type's dispute
    /// probability is the sigmoid of its indicator weight.
    fn artifacts() -> ArtifactSet {
        let mut vocabulary = HashMap::new();
        vocabulary.insert("overdraft".to_string(), 0);
        vocabulary.insert("fees".to_string(), 1);
        vocabulary.insert("mortgage".to_string(), 2);
        vocabulary.insert("card".to_string(), 3);
        let text_width = 4;

        let mut escalation = vec![0.0; text_width + augmented_row_width()];
        let one_hot_base = text_width + SENTIMENT_COLUMNS.len();
        for (i, w) in [2.0, 0.5, -3.0, -1.0, 1.0, 3.0].iter().enumerate() {
            escalation[one_hot_base + i] = *w;
        }

        ArtifactSet {
            escalation_model: LinearModel {
                coefficients: vec![escalation],
                intercepts: vec![0.0],
            },
            product_model: LinearModel {
                coefficients: vec![
                    vec![5.0, 1.0, 0.0, 0.0],
                    vec![0.0, 0.0, 0.0, 5.0],
                    vec![0.0, 0.0, 5.0, 0.0],
                ],
                intercepts: vec![0.0, 0.0, 0.0],
            },
            vectorizer: TfidfVectorizer {
                vocabulary,
                idf: vec![1.0; 4],
            },
            scaler: StandardScaler {
                columns: vec!["word_num".into(), "sentence_num".into()],
                mean: vec![0.0, 0.0],
                scale: vec![1.0, 1.0],
            },
            product_labels: vec![
                "Bank account or service".into(),
                "Credit card".into(),
                "Mortgage".into(),
            ],
            stopwords: ["the", "my", "on", "was", "i"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            lexicon: SentimentLexicon {
                terms: [("charged".to_string(), -1.4)].into_iter().collect(),
            },
        }
    }

    fn predictor() -> Predictor {
        Predictor::new(
            artifacts(),
            PolicyConfig {
                escalation_threshold: 0.5,
                preferred_margin: 0.15,
            },
        )
    }

    #[test]
    fn test_predict_end_to_end() {
        let p = predictor();
        let result = p
            .predict("I was charged overdraft fees on my checking account!")
            .unwrap();

        assert_eq!(result.product, "Bank account or service");
        // sigmoid(-3) ≈ 0.047 is the global minimum (monetary relief);
        // sigmoid(-1) ≈ 0.269 is the best qualifier under the 0.35 ceiling.
        assert_eq!(
            result.recommended,
            ResponseType::ClosedWithNonMonetaryRelief
        );
    }

    #[test]
    fn test_predict_probabilities_complete() {
        let p = predictor();
        let result = p.predict("My mortgage servicer never responds.").unwrap();
        assert_eq!(result.product, "Mortgage");

        let responses: Vec<ResponseType> = result.probabilities.iter().map(|(r, _)| r).collect();
        assert_eq!(responses.as_slice(), ResponseType::ordered());
        for (_, prob) in result.probabilities.iter() {
            assert!((0.0..=1.0).contains(&prob));
        }
    }

    #[test]
    fn test_predict_rejects_empty_input() {
        let p = predictor();
        assert!(p.predict("").is_err());
        assert!(p.predict(" \n\t ").is_err());
    }

    #[test]
    fn test_predict_is_deterministic() {
        let p = predictor();
        let narrative = "Unexpected fees on my card statement.";
        let a = p.predict(narrative).unwrap();
        let b = p.predict(narrative).unwrap();
        assert_eq!(a.probabilities, b.probabilities);
        assert_eq!(a.recommended, b.recommended);
        assert_eq!(a.product, b.product);
    }

    #[test]
    fn test_result_serializes_dataset_labels() {
        let p = predictor();
        let result = p.predict("Unexpected fees on my card.").unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"Credit card\""));
        assert!(json.contains("Closed with non-monetary relief"));
    }
}
