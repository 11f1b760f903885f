// Evaluation metrics for the two-class classifier.

pub mod confusion;
pub mod report;

pub use confusion::ConfusionMatrix;
pub use report::ClassificationReport;
