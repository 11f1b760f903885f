// Training pipeline: CSVs in, fitted vectorizer + classifier artifacts out.
//
// Steps: load and label both CSVs (fake rows first), seeded shuffle,
// optional CI sample, clean, stratified split, fit the vectorizer on the
// training partition only, fit the classifier, score the held-out partition,
// record the run, then persist both artifacts together. Nothing is written
// to the model directory until every earlier step has succeeded.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::evaluate::{self, EvaluationReport};
use super::{close_run, prepare_examples};
use crate::data::loader;
use crate::data::models::{Label, NormalizedExample};
use crate::data::split::{self, Split, DEFAULT_SEED};
use crate::features::tfidf::{TfIdfParams, TfIdfVectorizer};
use crate::features::traits::FeatureExtractor;
use crate::model::artifacts::{self, ArtifactPaths};
use crate::model::logistic::{LogisticParams, LogisticRegression, MODEL_TYPE};
use crate::tracking::RunTracker;

/// Rows kept when running in CI mode.
pub const CI_SAMPLE_SIZE: usize = 2000;

/// Share of rows held out for testing.
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainParams {
    pub seed: u64,
    pub test_size: f64,
    /// Seeded sample size after the shuffle; None trains on every row.
    pub sample_size: Option<usize>,
    pub tfidf: TfIdfParams,
    pub logistic: LogisticParams,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            test_size: DEFAULT_TEST_SIZE,
            sample_size: None,
            tfidf: TfIdfParams::default(),
            logistic: LogisticParams::default(),
        }
    }
}

impl TrainParams {
    /// Defaults, with the CI sample applied when `ci` is set.
    pub fn for_ci(ci: bool) -> Self {
        Self {
            sample_size: ci.then_some(CI_SAMPLE_SIZE),
            ..Self::default()
        }
    }
}

/// Everything a training run produced.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub vectorizer: TfIdfVectorizer,
    pub model: LogisticRegression,
    /// Indices into the shuffled (and sampled) dataset
    pub split: Split,
    /// Scores on the held-out partition
    pub evaluation: EvaluationReport,
    /// Where the artifacts were written; None when fitted in memory only
    pub artifacts: Option<ArtifactPaths>,
}

/// Run the full pipeline and persist the artifacts into `model_dir`.
///
/// The tracked run is closed as FAILED if any step errors.
pub fn run(
    fake_csv: &Path,
    real_csv: &Path,
    model_dir: &Path,
    params: &TrainParams,
    tracker: &mut dyn RunTracker,
) -> Result<TrainOutcome> {
    let result = train_and_save(fake_csv, real_csv, model_dir, params, tracker);
    close_run(tracker, result)
}

fn train_and_save(
    fake_csv: &Path,
    real_csv: &Path,
    model_dir: &Path,
    params: &TrainParams,
    tracker: &mut dyn RunTracker,
) -> Result<TrainOutcome> {
    let raw = loader::load_dataset(fake_csv, real_csv)?;
    info!(rows = raw.len(), "Loaded dataset");

    let examples = prepare_examples(raw, params.seed, params.sample_size);
    let mut outcome = fit_and_evaluate(&examples, params)?;

    tracker.log_param("model_type", MODEL_TYPE)?;
    tracker.log_param(
        "max_features",
        &params
            .tfidf
            .max_features
            .map_or_else(|| "none".to_string(), |n| n.to_string()),
    )?;
    tracker.log_param("ngram_range", &params.tfidf.ngram_label())?;
    tracker.log_param("test_size", &params.test_size.to_string())?;
    tracker.log_param("seed", &params.seed.to_string())?;
    tracker.log_param("ci_mode", &params.sample_size.is_some().to_string())?;
    tracker.log_param("train_rows", &outcome.split.train.len().to_string())?;
    tracker.log_param("test_rows", &outcome.split.test.len().to_string())?;
    tracker.log_metric("accuracy", outcome.evaluation.accuracy)?;
    tracker.log_metric("macro_f1", outcome.evaluation.report.macro_avg.f1)?;

    let paths = artifacts::save(model_dir, &outcome.vectorizer, &outcome.model)?;
    tracker.log_artifact(&paths.vectorizer)?;
    tracker.log_artifact(&paths.model)?;
    outcome.artifacts = Some(paths);

    Ok(outcome)
}

/// Split already-cleaned examples, fit both stages on the training rows and
/// score the held-out rows. Writes nothing to disk.
pub fn fit_and_evaluate(
    examples: &[NormalizedExample],
    params: &TrainParams,
) -> Result<TrainOutcome> {
    let labels: Vec<Label> = examples.iter().map(|e| e.label).collect();
    let split = split::stratified_split(&labels, params.test_size, params.seed)
        .context("Failed to split dataset")?;
    info!(
        train = split.train.len(),
        test = split.test.len(),
        "Stratified split"
    );

    let (train_texts, train_labels) = gather(examples, &split.train);
    let (test_texts, test_labels) = gather(examples, &split.test);

    let vectorizer = TfIdfVectorizer::fit(&train_texts, params.tfidf.clone())
        .context("Failed to fit vectorizer")?;
    info!(
        vocabulary = vectorizer.vocabulary_len(),
        "Fitted TF-IDF vectorizer"
    );

    let train_features = vectorizer.transform_batch(&train_texts);
    let model = LogisticRegression::fit(&train_features, &train_labels, params.logistic.clone())
        .context("Failed to fit classifier")?;

    let evaluation = evaluate::score(&vectorizer, &model, &test_texts, &test_labels)?;
    info!(accuracy = evaluation.accuracy, "Held-out evaluation");

    Ok(TrainOutcome {
        vectorizer,
        model,
        split,
        evaluation,
        artifacts: None,
    })
}

fn gather(examples: &[NormalizedExample], indices: &[usize]) -> (Vec<String>, Vec<Label>) {
    indices
        .iter()
        .map(|&i| (examples[i].cleaned_text.clone(), examples[i].label))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<NormalizedExample> {
        let fake = ["alien hoax moon", "hoax vaccine chip", "moon alien cover", "chip hoax"];
        let real = ["senator budget vote", "budget hearing senate", "hurricane senator aid", "vote hearing"];
        let mut out = Vec::new();
        for i in 0..5 {
            for text in fake {
                out.push(NormalizedExample {
                    cleaned_text: format!("{text} fake{i}"),
                    label: Label::Fake,
                });
            }
            for text in real {
                out.push(NormalizedExample {
                    cleaned_text: format!("{text} real{i}"),
                    label: Label::Real,
                });
            }
        }
        out
    }

    #[test]
    fn test_fit_and_evaluate_separable_corpus() {
        let outcome = fit_and_evaluate(&corpus(), &TrainParams::default()).unwrap();
        assert_eq!(outcome.split.test.len(), 8);
        assert_eq!(outcome.split.train.len(), 32);
        assert_eq!(outcome.evaluation.examples, 8);
        assert!(outcome.evaluation.accuracy >= 0.99);
        assert!(outcome.artifacts.is_none());
    }

    #[test]
    fn test_for_ci_sets_sample() {
        assert_eq!(TrainParams::for_ci(true).sample_size, Some(CI_SAMPLE_SIZE));
        assert_eq!(TrainParams::for_ci(false).sample_size, None);
    }

    #[test]
    fn test_single_class_fails() {
        let only_fake: Vec<NormalizedExample> = corpus()
            .into_iter()
            .filter(|e| e.label == Label::Fake)
            .collect();
        assert!(fit_and_evaluate(&only_fake, &TrainParams::default()).is_err());
    }
}
