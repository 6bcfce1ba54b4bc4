//! Runs the delay over every configured (input, output) pair.
//!
//! Each job owns its source, sink and delay line, so jobs can run on worker
//! threads without sharing anything mutable. Results always come back in
//! job order.

pub mod report;

pub use report::{JobOutcome, JobResult, SessionReport};

use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use tracing::{error, info, warn};

use crate::audio::{DelayLimits, EffectParameters, ProcessReport, apply_delay};
use crate::common::{DelayError, DelayResult};
use crate::configs::{ErrorPolicy, JobConfig, SessionConfig};

pub struct Session {
    config: SessionConfig,
    params: EffectParameters,
    limits: DelayLimits,
}

impl Session {
    pub fn new(config: SessionConfig, params: EffectParameters, limits: DelayLimits) -> Self {
        Self {
            config,
            params,
            limits,
        }
    }

    pub fn jobs(&self) -> &[JobConfig] {
        &self.config.jobs
    }

    /// Output path after applying `output_dir` to relative outputs.
    pub fn resolve_output(&self, job: &JobConfig) -> PathBuf {
        match &self.config.output_dir {
            Some(dir) if job.output.is_relative() => dir.join(&job.output),
            _ => job.output.clone(),
        }
    }

    pub fn run(&self) -> SessionReport {
        let workers = self.config.workers.max(1).min(self.config.jobs.len().max(1));
        info!(
            "Processing {} job(s) with {} worker(s)",
            self.config.jobs.len(),
            workers
        );

        let results = if workers == 1 {
            self.run_sequential()
        } else {
            self.run_parallel(workers)
        };

        let report = SessionReport { results };
        info!(
            "Session finished: {} completed, {} failed, {} skipped",
            report.completed(),
            report.failed(),
            report.skipped()
        );
        report
    }

    fn run_sequential(&self) -> Vec<JobResult> {
        let mut halted = false;
        self.config
            .jobs
            .iter()
            .map(|job| {
                if halted {
                    return self.skipped(job);
                }
                let result = self.run_job(job);
                halted = self.should_halt(&result);
                result
            })
            .collect()
    }

    fn run_parallel(&self, workers: usize) -> Vec<JobResult> {
        let (job_tx, job_rx) = flume::unbounded::<(usize, &JobConfig)>();
        let (result_tx, result_rx) = flume::unbounded::<(usize, JobResult)>();
        let halted = AtomicBool::new(false);

        for entry in self.config.jobs.iter().enumerate() {
            let _ = job_tx.send(entry);
        }
        drop(job_tx);

        std::thread::scope(|scope| {
            for id in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                let halted = &halted;

                let spawned = std::thread::Builder::new()
                    .name(format!("delay-worker-{}", id))
                    .spawn_scoped(scope, move || {
                        for (index, job) in job_rx.iter() {
                            let result = if halted.load(Ordering::Acquire) {
                                self.skipped(job)
                            } else {
                                let result = self.run_job(job);
                                if self.should_halt(&result) {
                                    halted.store(true, Ordering::Release);
                                }
                                result
                            };
                            if result_tx.send((index, result)).is_err() {
                                break;
                            }
                        }
                    });

                if let Err(e) = spawned {
                    warn!("Failed to spawn delay worker {}: {}", id, e);
                }
            }
        });
        drop(result_tx);

        let mut slots: Vec<Option<JobResult>> =
            std::iter::repeat_with(|| None).take(self.config.jobs.len()).collect();
        for (index, result) in result_rx.drain() {
            slots[index] = Some(result);
        }

        // Jobs no worker picked up (every spawn failed) still get a slot.
        slots
            .into_iter()
            .zip(&self.config.jobs)
            .map(|(slot, job)| slot.unwrap_or_else(|| self.skipped(job)))
            .collect()
    }

    fn should_halt(&self, result: &JobResult) -> bool {
        self.config.on_error == ErrorPolicy::Abort && result.error().is_some()
    }

    fn skipped(&self, job: &JobConfig) -> JobResult {
        JobResult {
            input: job.input.clone(),
            output: self.resolve_output(job),
            outcome: JobOutcome::Skipped,
        }
    }

    /// One invocation, plus the driver's side of it: the output directory
    /// before, partial-output cleanup after.
    pub fn run_job(&self, job: &JobConfig) -> JobResult {
        let output = self.resolve_output(job);
        info!("Applying delay: {} -> {}", job.input.display(), output.display());

        let outcome = match self.process(&job.input, &output) {
            Ok(report) => JobOutcome::Completed(report),
            Err(e) => {
                error!("{} failed: {}", job.input.display(), e);
                if self.config.remove_partial_output && e.left_partial_output() {
                    remove_partial(&output);
                }
                JobOutcome::Failed(e)
            }
        };

        JobResult {
            input: job.input.clone(),
            output,
            outcome,
        }
    }

    fn process(&self, input: &Path, output: &Path) -> DelayResult<ProcessReport> {
        // Bad parameters must not leave an empty directory behind.
        self.params.validate_with(&self.limits)?;
        ensure_parent_dir(output)?;
        apply_delay(input, output, &self.params, &self.limits)
    }
}

fn ensure_parent_dir(output: &Path) -> DelayResult<()> {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| DelayError::OutputDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

fn remove_partial(output: &Path) {
    match fs::remove_file(output) {
        Ok(()) => warn!("Removed partial output {}", output.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove partial output {}: {}", output.display(), e),
    }
}
