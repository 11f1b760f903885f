// Scoring: turns class probabilities into a served verdict.
//
// `decision` holds the confidence-threshold policy; `predictor` wires the
// normalizer, the loaded feature extractor and the classifier together.

pub mod decision;
pub mod predictor;

pub use decision::{DecisionPolicy, Verdict, DEFAULT_THRESHOLD};
pub use predictor::{PredictionResult, Predictor};
