// Colored terminal output for cleaning previews, training and evaluation
// reports, and single predictions.
//
// This module handles all terminal-specific formatting. The main.rs command
// handlers delegate here.

use colored::Colorize;

use crate::metrics::{ClassificationReport, ConfusionMatrix};
use crate::pipeline::evaluate::EvaluationReport;
use crate::pipeline::train::TrainOutcome;
use crate::scoring::decision::Verdict;
use crate::scoring::predictor::PredictionResult;

/// Show a text before and after cleaning.
pub fn display_cleaned(original: &str, cleaned: &str) {
    println!("\n{}", "=== Text Cleaning ===".bold());
    println!("  {} {}", "Original:".dimmed(), original);
    if cleaned.is_empty() {
        println!("  {} {}", "Cleaned: ".dimmed(), "(empty)".yellow());
    } else {
        println!("  {} {}", "Cleaned: ".dimmed(), cleaned.green());
    }
}

/// Summarize a finished training run.
pub fn display_training(outcome: &TrainOutcome, run_id: Option<&str>) {
    println!("\n{}", "=== Training Complete ===".bold());
    println!(
        "  Rows: {} train / {} test",
        outcome.split.train.len(),
        outcome.split.test.len()
    );
    println!("  Vocabulary: {} terms", outcome.vectorizer.vocabulary_len());

    let solver = if outcome.model.converged() {
        format!("converged in {} iterations", outcome.model.n_iter()).green()
    } else {
        format!("stopped at {} iterations (not converged)", outcome.model.n_iter()).yellow()
    };
    println!("  Solver: {solver}");

    display_scores(
        outcome.evaluation.accuracy,
        &outcome.evaluation.report,
        &outcome.evaluation.confusion,
    );

    if let Some(paths) = &outcome.artifacts {
        println!("\n  {} {}", "Saved".green(), paths.vectorizer.display());
        println!("  {} {}", "Saved".green(), paths.model.display());
    }
    if let Some(id) = run_id {
        println!("  {} {}", "Run:".dimmed(), id);
    }
}

/// Show an evaluation of persisted artifacts.
pub fn display_evaluation(evaluation: &EvaluationReport) {
    println!(
        "\n{}",
        format!("=== Evaluation ({} articles) ===", evaluation.examples).bold()
    );
    display_scores(
        evaluation.accuracy,
        &evaluation.report,
        &evaluation.confusion,
    );
}

fn display_scores(accuracy: f64, report: &ClassificationReport, confusion: &ConfusionMatrix) {
    println!("\n  Accuracy: {}", colorize_accuracy(accuracy));

    println!("\n  {}", "Classification report:".dimmed());
    for line in report.format().lines() {
        println!("  {line}");
    }

    println!("  {}", "Confusion matrix:".dimmed());
    for line in confusion.format().lines() {
        println!("  {line}");
    }
}

/// Show a single prediction.
pub fn display_prediction(text: &str, result: &PredictionResult, threshold: f64) {
    println!("\n{}", "=== Prediction ===".bold());
    println!("  {}", super::truncate_chars(text, 140).dimmed());
    println!(
        "\n  Verdict:    {} ({:.2}% confident)",
        colorize_verdict(result.prediction),
        result.confidence
    );
    println!(
        "  P(FAKE): {:>6.2}%   P(REAL): {:>6.2}%",
        result.probabilities.fake, result.probabilities.real
    );
    if result.prediction == Verdict::Uncertain {
        println!(
            "  {}",
            format!(
                "Neither class reached the {:.0}% confidence threshold.",
                threshold * 100.0
            )
            .yellow()
        );
    }
}

fn colorize_verdict(verdict: Verdict) -> colored::ColoredString {
    match verdict {
        Verdict::Fake => verdict.as_str().red().bold(),
        Verdict::Real => verdict.as_str().green().bold(),
        Verdict::Uncertain => verdict.as_str().yellow(),
    }
}

fn colorize_accuracy(accuracy: f64) -> colored::ColoredString {
    let text = format!("{:.4}", accuracy);
    if accuracy >= 0.9 {
        text.green().bold()
    } else if accuracy >= 0.7 {
        text.yellow()
    } else {
        text.red()
    }
}
