// Experiment tracking: records the params, metrics and artifact files of a
// training or evaluation run.

pub mod file;
pub mod traits;

pub use file::FileTracker;
pub use traits::{NoopTracker, RunStatus, RunTracker};
