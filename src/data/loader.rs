// CSV loading for the fake/real news datasets.
//
// Each source file holds articles of a single class and must have a `text`
// header column; any other columns (title, subject, date) are ignored. A row
// too short to reach the `text` column is kept with empty text, which cleans
// to an empty document.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::models::{Label, RawExample};

/// Name of the required article-body column.
pub const TEXT_COLUMN: &str = "text";

/// Load every row of `path`, tagging each with `label`.
pub fn load_labeled_csv(path: &Path, label: Label) -> Result<Vec<RawExample>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open dataset file: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header in {}", path.display()))?
        .clone();

    let Some(text_col) = headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == TEXT_COLUMN)
    else {
        anyhow::bail!(
            "{} has no `{}` column (found: {})",
            path.display(),
            TEXT_COLUMN,
            headers.iter().collect::<Vec<_>>().join(", ")
        );
    };

    let mut examples = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("Failed to read record {} in {}", row + 1, path.display()))?;
        examples.push(RawExample {
            text: record.get(text_col).unwrap_or("").to_string(),
            label,
        });
    }

    info!(path = %path.display(), rows = examples.len(), label = %label, "Loaded dataset file");
    Ok(examples)
}

/// Load the fake and real files and concatenate them, fake rows first.
pub fn load_dataset(fake_csv: &Path, real_csv: &Path) -> Result<Vec<RawExample>> {
    let mut examples = load_labeled_csv(fake_csv, Label::Fake)?;
    examples.extend(load_labeled_csv(real_csv, Label::Real)?);
    Ok(examples)
}
