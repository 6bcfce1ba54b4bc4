use std::{path::PathBuf, process::ExitCode};

use rustecho::common::{self, AnyResult};
use rustecho::configs::Config;
use rustecho::session::{JobOutcome, Session};
use tracing::{info, warn};

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("rustecho: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether every job completed.
fn run() -> AnyResult<bool> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;

    common::logger::init(&config);
    info!("rustecho v{}", env!("CARGO_PKG_VERSION"));

    if config.session.jobs.is_empty() {
        warn!("No jobs configured under [[session.jobs]]; nothing to do");
        return Ok(true);
    }

    let session = Session::new(
        config.session.clone(),
        config.delay.params,
        config.delay.limits(),
    );
    let report = session.run();

    for result in &report.results {
        match &result.outcome {
            JobOutcome::Completed(r) => info!(
                "ok      {} ({} frames)",
                result.output.display(),
                r.frames
            ),
            JobOutcome::Failed(e) => warn!("failed  {}: {}", result.input.display(), e),
            JobOutcome::Skipped => warn!("skipped {}", result.input.display()),
        }
    }

    Ok(report.is_success())
}
