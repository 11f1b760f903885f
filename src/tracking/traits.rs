// Run tracker trait: the sink a pipeline reports its run to.
//
// The file-backed store is the default implementation. Tests and library
// callers that don't care about run history use NoopTracker.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Terminal state of a tracked run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Running => "RUNNING",
            RunStatus::Finished => "FINISHED",
            RunStatus::Failed => "FAILED",
        }
    }
}

pub trait RunTracker {
    /// Identifier of the active run, if the tracker keeps one.
    fn run_id(&self) -> Option<&str>;

    /// Record a parameter. Values are stored as strings; logging the same key
    /// twice keeps the latest value.
    fn log_param(&mut self, key: &str, value: &str) -> Result<()>;

    /// Record a numeric metric.
    fn log_metric(&mut self, key: &str, value: f64) -> Result<()>;

    /// Copy a file into the run's artifact area.
    fn log_artifact(&mut self, path: &Path) -> Result<()>;

    /// Close the run with a terminal status.
    fn finish(&mut self, status: RunStatus) -> Result<()>;
}

/// Tracker that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracker;

impl RunTracker for NoopTracker {
    fn run_id(&self) -> Option<&str> {
        None
    }

    fn log_param(&mut self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    fn log_metric(&mut self, _key: &str, _value: f64) -> Result<()> {
        Ok(())
    }

    fn log_artifact(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn finish(&mut self, _status: RunStatus) -> Result<()> {
        Ok(())
    }
}
