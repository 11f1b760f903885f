use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::model::artifacts::ArtifactPaths;
use crate::scoring::decision::{DecisionPolicy, DEFAULT_THRESHOLD};

/// Experiment name used when FAKENEWS_EXPERIMENT is unset.
pub const DEFAULT_EXPERIMENT: &str = "Fake-News-Detection";

/// Central configuration loaded from environment variables.
///
/// Every value has a default, so a bare checkout with `dataset/fake.csv`
/// and `dataset/true.csv` works without any .env file. The .env file is
/// loaded automatically at startup via dotenvy.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the labeled CSVs
    pub dataset_dir: PathBuf,
    pub fake_csv: PathBuf,
    pub real_csv: PathBuf,
    /// Where the vectorizer and classifier artifacts live
    pub model_dir: PathBuf,
    /// Root of the file-based experiment tracking store
    pub tracking_dir: PathBuf,
    pub experiment: String,
    /// Minimum winning-class probability for a FAKE/REAL verdict
    pub threshold: f64,
    /// CI mode: train on a 2000-row sample
    pub ci: bool,
    pub port: u16,
    pub bind: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Malformed numbers are an
    /// error rather than a silent fallback to the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let dataset_dir = get("FAKENEWS_DATASET_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./dataset"));
        let fake_csv = get("FAKENEWS_FAKE_CSV")
            .map(PathBuf::from)
            .unwrap_or_else(|| dataset_dir.join("fake.csv"));
        let real_csv = get("FAKENEWS_TRUE_CSV")
            .map(PathBuf::from)
            .unwrap_or_else(|| dataset_dir.join("true.csv"));

        let threshold = match get("FAKENEWS_THRESHOLD") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .with_context(|| format!("FAKENEWS_THRESHOLD is not a number: {raw:?}"))?,
            None => DEFAULT_THRESHOLD,
        };
        // Range check lives with the policy.
        DecisionPolicy::new(threshold).context("Invalid FAKENEWS_THRESHOLD")?;

        let port = match get("FAKENEWS_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("FAKENEWS_PORT is not a valid port: {raw:?}"))?,
            None => 5000,
        };

        Ok(Self {
            fake_csv,
            real_csv,
            dataset_dir,
            model_dir: get("FAKENEWS_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./models")),
            tracking_dir: get("FAKENEWS_TRACKING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./mlruns")),
            experiment: get("FAKENEWS_EXPERIMENT")
                .unwrap_or_else(|| DEFAULT_EXPERIMENT.to_string()),
            threshold,
            ci: get("CI").is_some_and(|v| v.trim().eq_ignore_ascii_case("true")),
            port,
            bind: get("FAKENEWS_BIND").unwrap_or_else(|| "127.0.0.1".to_string()),
        })
    }

    /// The decision policy for the configured threshold.
    pub fn policy(&self) -> Result<DecisionPolicy> {
        DecisionPolicy::new(self.threshold)
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::in_dir(&self.model_dir)
    }

    /// Check that both labeled CSVs exist.
    /// Call this before training or evaluation.
    pub fn require_dataset(&self) -> Result<()> {
        for (what, path) in [("Fake", &self.fake_csv), ("Real", &self.real_csv)] {
            if !path.exists() {
                anyhow::bail!(
                    "{what} news CSV not found at {}\n\
                     Set FAKENEWS_DATASET_DIR (or FAKENEWS_FAKE_CSV / FAKENEWS_TRUE_CSV) in your .env file.",
                    path.display()
                );
            }
        }
        Ok(())
    }

    /// Check that a trained artifact pair is present.
    /// Call this before evaluation, prediction or serving.
    pub fn require_artifacts(&self) -> Result<()> {
        if !self.artifact_paths().both_present() {
            anyhow::bail!(
                "Model artifacts not found in {}\n\
                 Run `fakenews train` to create them.",
                self.model_dir.display()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.fake_csv, PathBuf::from("./dataset/fake.csv"));
        assert_eq!(config.real_csv, PathBuf::from("./dataset/true.csv"));
        assert_eq!(config.model_dir, PathBuf::from("./models"));
        assert_eq!(config.experiment, DEFAULT_EXPERIMENT);
        assert_eq!(config.threshold, DEFAULT_THRESHOLD);
        assert!(!config.ci);
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_dataset_dir_moves_both_csvs() {
        let config = config_from(&[("FAKENEWS_DATASET_DIR", "/data")]).unwrap();
        assert_eq!(config.fake_csv, PathBuf::from("/data/fake.csv"));
        assert_eq!(config.real_csv, PathBuf::from("/data/true.csv"));
    }

    #[test]
    fn test_ci_flag_is_case_insensitive() {
        assert!(config_from(&[("CI", "TRUE")]).unwrap().ci);
        assert!(config_from(&[("CI", "true")]).unwrap().ci);
        assert!(!config_from(&[("CI", "1")]).unwrap().ci);
    }

    #[test]
    fn test_bad_numbers_are_errors() {
        assert!(config_from(&[("FAKENEWS_THRESHOLD", "high")]).is_err());
        assert!(config_from(&[("FAKENEWS_THRESHOLD", "1.5")]).is_err());
        assert!(config_from(&[("FAKENEWS_PORT", "99999")]).is_err());
        assert_eq!(
            config_from(&[("FAKENEWS_THRESHOLD", "0.8")]).unwrap().threshold,
            0.8
        );
    }
}
