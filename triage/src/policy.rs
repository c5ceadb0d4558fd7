//! Response recommendation policy.
//!
//! Maps a complete escalation probability vector to one recommended
//! response type. The rule is a cost-aware override of naive arg-min
//! selection: the globally cheapest-looking response is systematically a
//! costly concession (monetary relief scores lowest because paying people
//! off works), so the policy prefers the *highest* probability that still
//! sits safely under the escalation ceiling, and only falls back to the
//! global minimum when nothing qualifies.

use tracing::debug;

use crate::config::PolicyConfig;
use crate::schema::ResponseType;
use crate::scorer::EscalationProbabilities;

/// Deterministic recommendation rule over escalation probabilities.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationPolicy {
    config: PolicyConfig,
}

impl RecommendationPolicy {
    /// Policy with the given constants.
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    /// The configured constants.
    pub fn config(&self) -> PolicyConfig {
        self.config
    }

    /// Recommend a response type. Pure: identical input yields identical
    /// output.
    ///
    /// 1. Start from the arg-min (first occurrence on ties).
    /// 2. Among probabilities strictly between the global minimum and the
    ///    preferred ceiling, pick the largest; it overrides the arg-min.
    /// 3. If the ceiling does not exceed the global minimum, no override
    ///    can qualify and the arg-min stands.
    pub fn recommend(&self, probabilities: &EscalationProbabilities) -> ResponseType {
        let ceiling = self.config.preferred_ceiling();
        let (mut best, global_min) = probabilities.arg_min();

        if ceiling > global_min {
            let mut best_override: Option<(ResponseType, f64)> = None;
            for (response, p) in probabilities.iter() {
                if p < ceiling && p > global_min {
                    let better = match best_override {
                        None => true,
                        Some((_, current)) => p > current,
                    };
                    if better {
                        best_override = Some((response, p));
                    }
                }
            }
            if let Some((response, p)) = best_override {
                debug!(
                    response = %response,
                    probability = p,
                    ceiling,
                    global_min,
                    "Cost-aware override of arg-min"
                );
                best = response;
            }
        }

        best
    }
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self::new(PolicyConfig {
            escalation_threshold: 0.5,
            preferred_margin: 0.15,
        })
    }
}
