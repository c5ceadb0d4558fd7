//! Complaint escalation triage library.
//!
//! Given a raw consumer-complaint narrative, this crate:
//! - classifies the complaint's product category,
//! - scores the probability that the complaint escalates to a formal
//!   dispute under each candidate company response type,
//! - recommends the response type with acceptable (low but non-minimal)
//!   escalation risk,
//! - optionally renders the probability vector as a bar chart.
//!
//! All model artifacts (classifiers, TF-IDF vectorizer, scaler, label
//! enumeration, stop words, valence lexicon) are trained elsewhere and
//! loaded once at startup into an immutable [`ArtifactSet`]; every
//! decision in this crate is deterministic given those artifacts.
//!
//! # Usage
//!
//! ```no_run
//! use triage::{Predictor, TriageConfig};
//!
//! let config = TriageConfig::default();
//! let predictor = Predictor::from_config(&config)?;
//! let result = predictor.predict("I was charged overdraft fees twice!")?;
//! println!("{} -> {}", result.product, result.recommended);
//! # Ok::<(), triage::TriageError>(())
//! ```

pub mod artifacts;
pub mod chart;
pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod policy;
pub mod predictor;
pub mod product;
pub mod schema;
pub mod scorer;
pub mod sentiment;
pub mod text;
pub mod vectorize;

pub use artifacts::ArtifactSet;
pub use config::{PolicyConfig, TriageConfig};
pub use error::{TriageError, TriageResult};
pub use features::FeatureBuilder;
pub use policy::RecommendationPolicy;
pub use predictor::{PredictionResult, Predictor};
pub use product::ProductClassifier;
pub use schema::{ResponseType, SentimentFeatureRow, SENTIMENT_COLUMNS};
pub use scorer::{EscalationProbabilities, EscalationScorer};
