// Evaluation of persisted artifacts against labeled CSVs.
//
// The vectorizer and classifier are only ever borrowed immutably here. Rows
// are prepared exactly like training (same concatenation order, same seeded
// shuffle, same cleaning) but the feature space is whatever the loaded
// vectorizer already holds.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use super::{close_run, prepare_examples};
use crate::data::loader;
use crate::data::models::{Label, NormalizedExample};
use crate::data::split::DEFAULT_SEED;
use crate::features::traits::FeatureExtractor;
use crate::metrics::{ClassificationReport, ConfusionMatrix};
use crate::model::traits::Classifier;
use crate::tracking::RunTracker;

/// Row preparation for an evaluation run.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluateParams {
    pub seed: u64,
    /// Seeded sample size after the shuffle (CI mode); None keeps every row.
    pub sample_size: Option<usize>,
}

impl Default for EvaluateParams {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            sample_size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    /// Number of rows scored
    pub examples: usize,
    pub accuracy: f64,
    pub report: ClassificationReport,
    pub confusion: ConfusionMatrix,
}

/// Score `classifier` on already-cleaned texts.
pub fn score(
    extractor: &dyn FeatureExtractor,
    classifier: &dyn Classifier,
    texts: &[String],
    labels: &[Label],
) -> Result<EvaluationReport> {
    if extractor.dimension() != classifier.n_features() {
        anyhow::bail!(
            "Classifier expects {} features but the extractor produces {}",
            classifier.n_features(),
            extractor.dimension()
        );
    }
    if texts.len() != labels.len() {
        anyhow::bail!("Got {} texts but {} labels", texts.len(), labels.len());
    }

    let predicted: Vec<Label> = extractor
        .transform_batch(texts)
        .iter()
        .map(|x| classifier.predict(x))
        .collect();

    let confusion = ConfusionMatrix::from_predictions(labels, &predicted)?;
    let report = ClassificationReport::from_confusion(&confusion);
    Ok(EvaluationReport {
        examples: texts.len(),
        accuracy: confusion.accuracy(),
        report,
        confusion,
    })
}

pub fn evaluate_examples(
    extractor: &dyn FeatureExtractor,
    classifier: &dyn Classifier,
    examples: &[NormalizedExample],
) -> Result<EvaluationReport> {
    let (texts, labels): (Vec<String>, Vec<Label>) = examples
        .iter()
        .map(|e| (e.cleaned_text.clone(), e.label))
        .unzip();
    score(extractor, classifier, &texts, &labels)
}

/// Load both CSVs, prepare them like training does, and score the loaded
/// artifacts on every row. Logs `eval_accuracy` to `tracker`.
pub fn run(
    extractor: &dyn FeatureExtractor,
    classifier: &dyn Classifier,
    fake_csv: &Path,
    real_csv: &Path,
    params: &EvaluateParams,
    tracker: &mut dyn RunTracker,
) -> Result<EvaluationReport> {
    let result = evaluate_files(extractor, classifier, fake_csv, real_csv, params, tracker);
    close_run(tracker, result)
}

fn evaluate_files(
    extractor: &dyn FeatureExtractor,
    classifier: &dyn Classifier,
    fake_csv: &Path,
    real_csv: &Path,
    params: &EvaluateParams,
    tracker: &mut dyn RunTracker,
) -> Result<EvaluationReport> {
    let raw = loader::load_dataset(fake_csv, real_csv)?;
    if raw.is_empty() {
        anyhow::bail!("No rows to evaluate in {} / {}", fake_csv.display(), real_csv.display());
    }
    let examples = prepare_examples(raw, params.seed, params.sample_size);

    tracker.log_param("seed", &params.seed.to_string())?;
    tracker.log_param("ci_mode", &params.sample_size.is_some().to_string())?;
    tracker.log_param("eval_rows", &examples.len().to_string())?;

    let evaluation = evaluate_examples(extractor, classifier, &examples)?;

    tracker.log_metric("eval_accuracy", evaluation.accuracy)?;
    tracker.log_metric("eval_macro_f1", evaluation.report.macro_avg.f1)?;

    info!(
        rows = evaluation.examples,
        accuracy = evaluation.accuracy,
        "Evaluation complete"
    );
    Ok(evaluation)
}
