// Feature extractor trait.
//
// Like the classifier trait in `model::traits`, this keeps the pipeline and
// the predictor independent of the concrete vectorizer. Extraction only ever
// borrows the extractor immutably: fitting happens in a constructor, so an
// extractor loaded from disk cannot be refit by evaluation or serving code.

use super::vector::FeatureVector;

/// Maps cleaned text onto a fixed-dimension sparse feature space.
pub trait FeatureExtractor: Send + Sync {
    /// Number of features (the vocabulary size).
    fn dimension(&self) -> usize;

    /// Transform one cleaned document. Empty text yields a zero vector.
    fn transform(&self, text: &str) -> FeatureVector;

    /// Transform many documents, preserving order.
    fn transform_batch(&self, texts: &[String]) -> Vec<FeatureVector> {
        texts.iter().map(|t| self.transform(t)).collect()
    }
}
