// File-backed run store.
//
// Layout: <root>/<experiment>/<run_id>/
//   meta.json      run id, experiment, status, start/end timestamps
//   params.json    string parameters
//   metrics.json   numeric metrics
//   artifacts/     copies of the files attached to the run
//
// params.json and metrics.json are rewritten on every log call so a crashed
// run still leaves everything logged up to that point on disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::traits::{RunStatus, RunTracker};

const META_FILE: &str = "meta.json";
const PARAMS_FILE: &str = "params.json";
const METRICS_FILE: &str = "metrics.json";
const ARTIFACTS_DIR: &str = "artifacts";

/// Run metadata stored in meta.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    pub run_id: String,
    pub experiment: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Everything recorded for one run, as read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub meta: RunMeta,
    pub params: BTreeMap<String, String>,
    pub metrics: BTreeMap<String, f64>,
    pub artifacts: Vec<String>,
}

pub struct FileTracker {
    dir: PathBuf,
    meta: RunMeta,
    params: BTreeMap<String, String>,
    metrics: BTreeMap<String, f64>,
}

impl FileTracker {
    /// Create a new run directory under `<root>/<experiment>/` and mark it
    /// RUNNING.
    pub fn start(root: &Path, experiment: &str) -> Result<Self> {
        validate_experiment_name(experiment)?;

        let started_at = Utc::now();
        let run_id = format!(
            "{}-{:08x}",
            started_at.format("%Y%m%dT%H%M%S"),
            rand::random::<u32>()
        );
        let dir = root.join(experiment).join(&run_id);
        fs::create_dir_all(dir.join(ARTIFACTS_DIR))
            .with_context(|| format!("Failed to create run directory: {}", dir.display()))?;

        let tracker = Self {
            dir,
            meta: RunMeta {
                run_id,
                experiment: experiment.to_string(),
                status: RunStatus::Running,
                started_at,
                finished_at: None,
            },
            params: BTreeMap::new(),
            metrics: BTreeMap::new(),
        };
        tracker.write_json(META_FILE, &tracker.meta)?;
        tracker.write_json(PARAMS_FILE, &tracker.params)?;
        tracker.write_json(METRICS_FILE, &tracker.metrics)?;

        info!(
            experiment,
            run_id = %tracker.meta.run_id,
            "Started tracked run"
        );
        Ok(tracker)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn meta(&self) -> &RunMeta {
        &self.meta
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.dir.join(file);
        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize {file}"))?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))
    }
}

impl RunTracker for FileTracker {
    fn run_id(&self) -> Option<&str> {
        Some(&self.meta.run_id)
    }

    fn log_param(&mut self, key: &str, value: &str) -> Result<()> {
        debug!(key, value, "log_param");
        self.params.insert(key.to_string(), value.to_string());
        self.write_json(PARAMS_FILE, &self.params)
    }

    fn log_metric(&mut self, key: &str, value: f64) -> Result<()> {
        if !value.is_finite() {
            anyhow::bail!("Metric {key} is not a finite number: {value}");
        }
        debug!(key, value, "log_metric");
        self.metrics.insert(key.to_string(), value);
        self.write_json(METRICS_FILE, &self.metrics)
    }

    fn log_artifact(&mut self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .with_context(|| format!("Artifact path has no file name: {}", path.display()))?;
        let dest = self.dir.join(ARTIFACTS_DIR).join(name);
        fs::copy(path, &dest).with_context(|| {
            format!("Failed to copy artifact {} into run store", path.display())
        })?;
        Ok(())
    }

    fn finish(&mut self, status: RunStatus) -> Result<()> {
        self.meta.status = status;
        self.meta.finished_at = Some(Utc::now());
        self.write_json(META_FILE, &self.meta)?;
        info!(
            run_id = %self.meta.run_id,
            status = status.as_str(),
            "Finished tracked run"
        );
        Ok(())
    }
}

/// Read one run directory back from disk.
pub fn read_run(dir: &Path) -> Result<RunRecord> {
    let meta: RunMeta = read_json(&dir.join(META_FILE))?;
    let params = read_optional_json(&dir.join(PARAMS_FILE));
    let metrics = read_optional_json(&dir.join(METRICS_FILE));

    let mut artifacts = Vec::new();
    if let Ok(entries) = fs::read_dir(dir.join(ARTIFACTS_DIR)) {
        for entry in entries.flatten() {
            artifacts.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    artifacts.sort();

    Ok(RunRecord {
        meta,
        params,
        metrics,
        artifacts,
    })
}

/// The most recently started run of `experiment`, if any. Directories that
/// don't hold a readable meta.json are skipped.
pub fn latest_run(root: &Path, experiment: &str) -> Result<Option<RunRecord>> {
    let experiment_dir = root.join(experiment);
    if !experiment_dir.is_dir() {
        return Ok(None);
    }

    let entries = fs::read_dir(&experiment_dir)
        .with_context(|| format!("Failed to list {}", experiment_dir.display()))?;

    let mut latest: Option<RunRecord> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Ok(record) = read_run(&path) else {
            continue;
        };
        let newer = latest.as_ref().map_or(true, |current| {
            (record.meta.started_at, &record.meta.run_id)
                > (current.meta.started_at, &current.meta.run_id)
        });
        if newer {
            latest = Some(record);
        }
    }
    Ok(latest)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let json =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

/// A run with nothing logged has no params.json / metrics.json, which reads
/// as empty. A file that exists but can't be parsed also reads as empty, with
/// a warning.
fn read_optional_json<T: serde::de::DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        return T::default();
    }
    match read_json(path) {
        Ok(value) => value,
        Err(e) => {
            warn!(path = %path.display(), error = %format!("{e:#}"), "Ignoring unreadable run file");
            T::default()
        }
    }
}

fn validate_experiment_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("Experiment name must not be empty");
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        anyhow::bail!("Experiment name must be a single path component, got {name:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_layout_and_readback() {
        let root = tempfile::tempdir().unwrap();
        let artifact = root.path().join("weights.json");
        fs::write(&artifact, "{}").unwrap();

        let mut tracker = FileTracker::start(root.path(), "exp").unwrap();
        tracker.log_param("seed", "42").unwrap();
        tracker.log_param("seed", "7").unwrap();
        tracker.log_metric("accuracy", 0.9).unwrap();
        tracker.log_artifact(&artifact).unwrap();
        tracker.finish(RunStatus::Finished).unwrap();

        let record = read_run(tracker.dir()).unwrap();
        assert_eq!(record.meta.status, RunStatus::Finished);
        assert!(record.meta.finished_at.is_some());
        assert_eq!(record.params.get("seed").map(String::as_str), Some("7"));
        assert_eq!(record.metrics.get("accuracy"), Some(&0.9));
        assert_eq!(record.artifacts, vec!["weights.json".to_string()]);
    }

    #[test]
    fn test_latest_run_picks_newest() {
        let root = tempfile::tempdir().unwrap();
        assert!(latest_run(root.path(), "exp").unwrap().is_none());

        let mut first = FileTracker::start(root.path(), "exp").unwrap();
        first.finish(RunStatus::Failed).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = FileTracker::start(root.path(), "exp").unwrap();

        let latest = latest_run(root.path(), "exp").unwrap().unwrap();
        assert_eq!(latest.meta.run_id, second.meta().run_id);
        assert_eq!(latest.meta.status, RunStatus::Running);
    }

    #[test]
    fn test_rejects_non_finite_metric() {
        let root = tempfile::tempdir().unwrap();
        let mut tracker = FileTracker::start(root.path(), "exp").unwrap();
        assert!(tracker.log_metric("loss", f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_path_like_experiment_names() {
        let root = tempfile::tempdir().unwrap();
        assert!(FileTracker::start(root.path(), "").is_err());
        assert!(FileTracker::start(root.path(), "../escape").is_err());
    }

    #[test]
    fn test_corrupt_metrics_reads_as_empty() {
        let root = tempfile::tempdir().unwrap();
        let mut tracker = FileTracker::start(root.path(), "exp").unwrap();
        tracker.log_param("seed", "42").unwrap();
        tracker.log_metric("accuracy", 0.9).unwrap();
        fs::write(tracker.dir().join(METRICS_FILE), "{\"accuracy\": ").unwrap();

        let record = read_run(tracker.dir()).unwrap();
        assert!(record.metrics.is_empty());
        assert_eq!(record.params.get("seed").map(String::as_str), Some("42"));
    }
}
