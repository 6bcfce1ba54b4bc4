use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What the session does with the remaining jobs after one fails.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Keep going; every job gets a result.
    #[default]
    Continue,
    /// Jobs not yet started are skipped.
    Abort,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct JobConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// `[session]` section.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Base directory for relative output paths.
    pub output_dir: Option<PathBuf>,
    pub on_error: ErrorPolicy,
    /// Delete an output file left half-written by a failed job.
    pub remove_partial_output: bool,
    /// Jobs run concurrently; 1 runs them in order on the calling thread.
    pub workers: usize,
    pub jobs: Vec<JobConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            on_error: ErrorPolicy::Continue,
            remove_partial_output: true,
            workers: 1,
            jobs: Vec::new(),
        }
    }
}
