// Training and evaluation pipelines.
//
// Both pipelines read the same two labeled CSVs and prepare them the same
// way (label, concatenate, seeded shuffle, optional CI sample, clean), so
// evaluation sees exactly the row order training saw.

pub mod evaluate;
pub mod train;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::data::models::{NormalizedExample, RawExample};
use crate::data::split;
use crate::tracking::{RunStatus, RunTracker};

/// Close the tracked run as FINISHED or FAILED depending on `result`.
///
/// A pipeline error takes precedence: if the run also fails to close, that
/// second error is only logged.
pub(crate) fn close_run<T>(tracker: &mut dyn RunTracker, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            tracker.finish(RunStatus::Finished)?;
            Ok(value)
        }
        Err(e) => {
            if let Err(close_err) = tracker.finish(RunStatus::Failed) {
                warn!(error = %close_err, "Failed to close tracked run");
            }
            Err(e)
        }
    }
}

/// Shuffle `examples` with `seed`, optionally keep a seeded sample of
/// `sample_size` rows, then clean every row.
pub fn prepare_examples(
    mut examples: Vec<RawExample>,
    seed: u64,
    sample_size: Option<usize>,
) -> Vec<NormalizedExample> {
    split::shuffle(&mut examples, seed);

    if let Some(n) = sample_size {
        if examples.len() < n {
            warn!(
                available = examples.len(),
                requested = n,
                "Dataset smaller than the sample size, using every row"
            );
        }
        examples = split::sample(examples, n, seed);
        info!(rows = examples.len(), "Sampled dataset");
    }

    let pb = ProgressBar::new(examples.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Cleaning [{bar:30}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let normalized = examples
        .iter()
        .map(|example| {
            let cleaned = example.normalize();
            pb.inc(1);
            cleaned
        })
        .collect();

    pb.finish_and_clear();
    normalized
}
