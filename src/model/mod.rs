// Classifier: logistic regression over TF-IDF features, plus persistence of
// the fitted vectorizer/classifier pair.

pub mod artifacts;
pub mod logistic;
pub mod traits;
