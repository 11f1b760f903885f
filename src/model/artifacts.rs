// Artifact persistence for the fitted vectorizer and classifier.
//
// Both artifacts are JSON files in one model directory. They are written as a
// pair: each is serialized and written to a temporary sibling first, and only
// when both writes succeed are they renamed into place. A failed training run
// therefore never leaves a half-updated pair behind.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::info;

use super::logistic::LogisticRegression;
use super::traits::Classifier;
use crate::features::tfidf::TfIdfVectorizer;

/// File name of the serialized vectorizer.
pub const VECTORIZER_FILE: &str = "tfidf_vectorizer.json";

/// File name of the serialized classifier.
pub const MODEL_FILE: &str = "fake_news_model.json";

/// Locations of the two artifact files inside a model directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub vectorizer: PathBuf,
    pub model: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            vectorizer: dir.join(VECTORIZER_FILE),
            model: dir.join(MODEL_FILE),
        }
    }

    pub fn both_present(&self) -> bool {
        self.vectorizer.exists() && self.model.exists()
    }
}

/// Persist a fitted vectorizer/classifier pair into `dir`.
pub fn save(
    dir: &Path,
    vectorizer: &TfIdfVectorizer,
    model: &LogisticRegression,
) -> Result<ArtifactPaths> {
    // Serialize both before touching the filesystem.
    let vectorizer_json =
        serde_json::to_string_pretty(vectorizer).context("Failed to serialize vectorizer")?;
    let model_json = serde_json::to_string_pretty(model).context("Failed to serialize model")?;

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    let paths = ArtifactPaths::in_dir(dir);
    let vectorizer_tmp = tmp_path(&paths.vectorizer);
    let model_tmp = tmp_path(&paths.model);

    let written = fs::write(&vectorizer_tmp, vectorizer_json)
        .and_then(|_| fs::write(&model_tmp, model_json));
    if let Err(e) = written {
        let _ = fs::remove_file(&vectorizer_tmp);
        let _ = fs::remove_file(&model_tmp);
        return Err(e).with_context(|| format!("Failed to write artifacts to {}", dir.display()));
    }

    fs::rename(&vectorizer_tmp, &paths.vectorizer)
        .with_context(|| format!("Failed to move {} into place", paths.vectorizer.display()))?;
    fs::rename(&model_tmp, &paths.model)
        .with_context(|| format!("Failed to move {} into place", paths.model.display()))?;

    info!(
        dir = %dir.display(),
        vocabulary = vectorizer.vocabulary_len(),
        "Saved model artifacts"
    );
    Ok(paths)
}

/// Load and cross-check the artifact pair from `dir`.
///
/// Fails if either file is missing or corrupt, or if the classifier was
/// trained on a feature space of a different size than the vectorizer's
/// vocabulary.
pub fn load(dir: &Path) -> Result<(TfIdfVectorizer, LogisticRegression)> {
    let paths = ArtifactPaths::in_dir(dir);
    let vectorizer: TfIdfVectorizer = read_json(&paths.vectorizer, "vectorizer")?;
    let model: LogisticRegression = read_json(&paths.model, "model")?;

    if model.n_features() != vectorizer.vocabulary_len() {
        anyhow::bail!(
            "Artifact mismatch: model expects {} features but the vectorizer has {} terms.\n\
             Re-run `fakenews train` to regenerate both artifacts together.",
            model.n_features(),
            vectorizer.vocabulary_len()
        );
    }

    info!(
        dir = %dir.display(),
        vocabulary = vectorizer.vocabulary_len(),
        "Loaded model artifacts"
    );
    Ok((vectorizer, model))
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    if !path.exists() {
        anyhow::bail!(
            "{what} artifact not found at {}\nRun `fakenews train` first.",
            path.display()
        );
    }
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} artifact: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Corrupt {what} artifact: {}", path.display()))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::Label;
    use crate::features::tfidf::TfIdfParams;
    use crate::features::traits::FeatureExtractor;
    use crate::model::logistic::LogisticParams;

    fn fitted() -> (TfIdfVectorizer, LogisticRegression) {
        let docs = vec![
            "alien hoax moon".to_string(),
            "senator budget vote".to_string(),
            "alien cover".to_string(),
            "budget senate".to_string(),
        ];
        let labels = vec![Label::Fake, Label::Real, Label::Fake, Label::Real];
        let vectorizer = TfIdfVectorizer::fit(&docs, TfIdfParams::default()).unwrap();
        let xs = vectorizer.transform_batch(&docs);
        let model = LogisticRegression::fit(&xs, &labels, LogisticParams::default()).unwrap();
        (vectorizer, model)
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let (vectorizer, model) = fitted();
        let paths = save(dir.path(), &vectorizer, &model).unwrap();
        assert!(paths.both_present());
        assert!(!tmp_path(&paths.model).exists());

        let (v2, m2) = load(dir.path()).unwrap();
        assert_eq!(v2.terms(), vectorizer.terms());
        assert_eq!(m2, model);
    }

    #[test]
    fn test_load_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_corrupt_model_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (vectorizer, model) = fitted();
        let paths = save(dir.path(), &vectorizer, &model).unwrap();
        fs::write(&paths.model, "{ not json").unwrap();
        assert!(load(dir.path()).is_err());
    }

    #[test]
    fn test_load_rejects_dimension_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let (vectorizer, _) = fitted();
        let other_docs = vec!["one two".to_string(), "three four five".to_string()];
        let other_vec = TfIdfVectorizer::fit(&other_docs, TfIdfParams::default()).unwrap();
        let xs = other_vec.transform_batch(&other_docs);
        let other_model =
            LogisticRegression::fit(&xs, &[Label::Fake, Label::Real], LogisticParams::default())
                .unwrap();
        assert_ne!(other_model.n_features(), vectorizer.vocabulary_len());

        save(dir.path(), &vectorizer, &other_model).unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("mismatch"));
    }
}
