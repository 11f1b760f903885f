// Classifier trait: swap-ready abstraction over the fitted model.
//
// The predictor and the evaluation code only need class probabilities, so
// anything that can produce calibrated P(FAKE), P(REAL) can stand in for
// logistic regression. Note that the serving decision threshold was chosen
// against logistic regression probabilities; another model family may need
// a different threshold.

use crate::data::models::Label;
use crate::features::vector::FeatureVector;

/// A fitted binary classifier over fixed-dimension feature vectors.
pub trait Classifier: Send + Sync {
    /// Expected feature dimension.
    fn n_features(&self) -> usize;

    /// Class probabilities indexed by class: `[P(FAKE), P(REAL)]`.
    fn predict_proba(&self, features: &FeatureVector) -> [f64; 2];

    /// The most probable class. Exact ties go to FAKE (class 0).
    fn predict(&self, features: &FeatureVector) -> Label {
        let [fake, real] = self.predict_proba(features);
        if real > fake {
            Label::Real
        } else {
            Label::Fake
        }
    }
}
