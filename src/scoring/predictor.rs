// Single-article prediction over loaded artifacts.
//
// A Predictor is built once from a fitted extractor and classifier and is
// read-only afterwards, so one instance can be shared across every request
// behind an Arc.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::decision::{DecisionPolicy, Verdict};
use crate::features::traits::FeatureExtractor;
use crate::model::artifacts;
use crate::model::traits::Classifier;
use crate::text::{clean_text, clean_value};

/// Class probabilities as percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub fake: f64,
    pub real: f64,
}

/// What `/predict` returns. All numbers are percentages (0 to 100) rounded
/// to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: Verdict,
    pub confidence: f64,
    pub probabilities: ClassProbabilities,
}

pub struct Predictor {
    extractor: Box<dyn FeatureExtractor>,
    classifier: Box<dyn Classifier>,
    policy: DecisionPolicy,
}

impl Predictor {
    /// Wire a fitted extractor and classifier together. Fails if their
    /// feature dimensions disagree.
    pub fn new(
        extractor: Box<dyn FeatureExtractor>,
        classifier: Box<dyn Classifier>,
        policy: DecisionPolicy,
    ) -> Result<Self> {
        if extractor.dimension() != classifier.n_features() {
            anyhow::bail!(
                "Classifier expects {} features but the extractor produces {}",
                classifier.n_features(),
                extractor.dimension()
            );
        }
        Ok(Self {
            extractor,
            classifier,
            policy,
        })
    }

    /// Load the persisted vectorizer/classifier pair from `model_dir`.
    pub fn load(model_dir: &Path, policy: DecisionPolicy) -> Result<Self> {
        let (vectorizer, model) = artifacts::load(model_dir)?;
        Self::new(Box::new(vectorizer), Box::new(model), policy)
    }

    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    /// Feature dimension shared by the extractor and the classifier.
    pub fn dimension(&self) -> usize {
        self.extractor.dimension()
    }

    /// Classify raw article text.
    pub fn predict(&self, text: &str) -> PredictionResult {
        self.predict_cleaned(&clean_text(text))
    }

    /// Classify a JSON value. Anything but a string is treated as empty text.
    pub fn predict_value(&self, value: Option<&Value>) -> PredictionResult {
        self.predict_cleaned(&clean_value(value))
    }

    fn predict_cleaned(&self, cleaned: &str) -> PredictionResult {
        let features = self.extractor.transform(cleaned);
        let [fake, real] = self.classifier.predict_proba(&features);
        let decision = self.policy.decide([fake, real]);
        PredictionResult {
            prediction: decision.verdict,
            confidence: to_percent(decision.confidence),
            probabilities: ClassProbabilities {
                fake: to_percent(fake),
                real: to_percent(real),
            },
        }
    }
}

/// Probability (0.0 to 1.0) to a percentage rounded to two decimals.
pub fn to_percent(p: f64) -> f64 {
    (p * 10_000.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::vector::FeatureVector;

    struct ConstExtractor;

    impl FeatureExtractor for ConstExtractor {
        fn dimension(&self) -> usize {
            2
        }

        fn transform(&self, text: &str) -> FeatureVector {
            if text.is_empty() {
                FeatureVector::zeros(2)
            } else {
                FeatureVector::from_entries(2, vec![(0, 1.0)])
            }
        }
    }

    /// About 0.877 REAL for any non-empty document, a coin flip for the zero vector.
    struct ConstClassifier;

    impl Classifier for ConstClassifier {
        fn n_features(&self) -> usize {
            2
        }

        fn predict_proba(&self, features: &FeatureVector) -> [f64; 2] {
            if features.is_zero() {
                [0.5, 0.5]
            } else {
                [0.123456, 0.876544]
            }
        }
    }

    fn predictor() -> Predictor {
        Predictor::new(
            Box::new(ConstExtractor),
            Box::new(ConstClassifier),
            DecisionPolicy::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_to_percent_rounds_to_two_decimals() {
        assert_eq!(to_percent(0.123456), 12.35);
        assert_eq!(to_percent(1.0), 100.0);
        assert_eq!(to_percent(0.0), 0.0);
    }

    #[test]
    fn test_predict_reports_percentages() {
        let result = predictor().predict("Senators debate the hurricane budget");
        assert_eq!(result.prediction, Verdict::Real);
        assert_eq!(result.confidence, 87.65);
        assert_eq!(result.probabilities.fake, 12.35);
        assert_eq!(result.probabilities.real, 87.65);
    }

    #[test]
    fn test_non_string_value_is_empty_text() {
        let p = predictor();
        let result = p.predict_value(Some(&serde_json::json!(42)));
        assert_eq!(result, p.predict(""));
        assert_eq!(result.prediction, Verdict::Uncertain);
        assert_eq!(p.predict_value(None), result);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        struct Narrow;
        impl Classifier for Narrow {
            fn n_features(&self) -> usize {
                1
            }
            fn predict_proba(&self, _: &FeatureVector) -> [f64; 2] {
                [0.5, 0.5]
            }
        }
        let result = Predictor::new(
            Box::new(ConstExtractor),
            Box::new(Narrow),
            DecisionPolicy::default(),
        );
        assert!(result.is_err());
    }
}
