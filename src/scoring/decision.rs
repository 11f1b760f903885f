// Confidence-threshold decision policy.
//
// The classifier always names its most probable class. The policy only
// reports that class when its probability reaches the threshold; anything
// less confident is reported as UNCERTAIN instead of a coin-flip label.

use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::models::Label;

/// Minimum winning-class probability for a FAKE/REAL verdict.
pub const DEFAULT_THRESHOLD: f64 = 0.65;

/// What the service reports for one article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Fake,
    Real,
    Uncertain,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Fake => "FAKE",
            Verdict::Real => "REAL",
            Verdict::Uncertain => "UNCERTAIN",
        }
    }
}

impl From<Label> for Verdict {
    fn from(label: Label) -> Self {
        match label {
            Label::Fake => Verdict::Fake,
            Label::Real => Verdict::Real,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict plus the winning-class probability it was based on (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub verdict: Verdict,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPolicy {
    threshold: f64,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl DecisionPolicy {
    /// A policy with a custom threshold in (0, 1].
    pub fn new(threshold: f64) -> Result<Self> {
        if !(threshold > 0.0 && threshold <= 1.0) {
            anyhow::bail!("Decision threshold must be in (0, 1], got {threshold}");
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Decide from `[P(FAKE), P(REAL)]`. Exact probability ties pick FAKE.
    pub fn decide(&self, proba: [f64; 2]) -> Decision {
        let [fake, real] = proba;
        let (label, confidence) = if real > fake {
            (Label::Real, real)
        } else {
            (Label::Fake, fake)
        };
        let verdict = if confidence >= self.threshold {
            Verdict::from(label)
        } else {
            Verdict::Uncertain
        };
        Decision {
            verdict,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confident_predictions_keep_label() {
        let policy = DecisionPolicy::default();
        assert_eq!(policy.decide([0.9, 0.1]).verdict, Verdict::Fake);
        assert_eq!(policy.decide([0.2, 0.8]).verdict, Verdict::Real);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let policy = DecisionPolicy::default();
        let at = policy.decide([0.35, 0.65]);
        assert_eq!(at.verdict, Verdict::Real);
        assert_eq!(at.confidence, 0.65);

        let below = policy.decide([0.3501, 0.6499]);
        assert_eq!(below.verdict, Verdict::Uncertain);
        assert_eq!(below.confidence, 0.6499);
    }

    #[test]
    fn test_tie_goes_to_fake() {
        let policy = DecisionPolicy::new(0.5).unwrap();
        assert_eq!(policy.decide([0.5, 0.5]).verdict, Verdict::Fake);
    }

    #[test]
    fn test_threshold_range() {
        assert!(DecisionPolicy::new(0.0).is_err());
        assert!(DecisionPolicy::new(1.5).is_err());
        assert!(DecisionPolicy::new(f64::NAN).is_err());
        assert!(DecisionPolicy::new(1.0).is_ok());
    }

    #[test]
    fn test_verdict_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Verdict::Uncertain).unwrap(), "\"UNCERTAIN\"");
    }
}
