use std::path::PathBuf;

use crate::audio::ProcessReport;
use crate::common::DelayError;

#[derive(Debug)]
pub enum JobOutcome {
    Completed(ProcessReport),
    Failed(DelayError),
    /// Not attempted because an earlier job failed under `ErrorPolicy::Abort`.
    Skipped,
}

#[derive(Debug)]
pub struct JobResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub outcome: JobOutcome,
}

impl JobResult {
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, JobOutcome::Completed(_))
    }

    pub fn error(&self) -> Option<&DelayError> {
        match &self.outcome {
            JobOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Per-job results, in the order the jobs were configured.
#[derive(Debug, Default)]
pub struct SessionReport {
    pub results: Vec<JobResult>,
}

impl SessionReport {
    pub fn completed(&self) -> usize {
        self.results.iter().filter(|r| r.is_completed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.error().is_some()).count()
    }

    pub fn skipped(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, JobOutcome::Skipped))
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.results.iter().all(JobResult::is_completed)
    }
}
