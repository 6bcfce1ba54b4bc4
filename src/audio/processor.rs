//! `DelayProcessor` — ties source → feedback delay → sink.
//!
//! One invocation reads a block exactly one delay long, runs it through
//! [`FeedbackDelay`], writes it out and folds it into the delay line before
//! the next read. Blocks are strictly sequential: block `n + 1` depends on
//! block `n`'s output.

use std::{fmt, path::Path};

use tracing::{Level, debug, info, span};

use crate::audio::{
    filters::{AudioFilter, FeedbackDelay},
    params::{DelayLimits, EffectParameters},
    sink::WavSink,
    source::{AudioStreamInfo, FileSource, MemorySink, MemorySource, SampleSink, SampleSource},
};
use crate::common::{DelayError, DelayResult};

/// Counters for one finished invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessReport {
    pub blocks: u64,
    pub samples: u64,
    pub frames: u64,
}

pub struct DelayProcessor<S, K> {
    source: S,
    sink: K,
    filter: FeedbackDelay,
    block: Vec<f32>,
}

impl<S: SampleSource, K: SampleSink> DelayProcessor<S, K> {
    pub fn new(source: S, sink: K, filter: FeedbackDelay) -> Self {
        let block = vec![0.0; filter.block_size()];
        Self {
            source,
            sink,
            filter,
            block,
        }
    }

    /// Run until the source is exhausted, then finalize the sink.
    ///
    /// The first read or write error aborts the loop and is returned as is;
    /// whatever was already written stays in the sink.
    pub fn run(&mut self) -> DelayResult<ProcessReport> {
        let _span = span!(Level::DEBUG, "delay_processor").entered();

        let channels = self.source.info().channels.max(1) as u64;
        let mut report = ProcessReport::default();

        if !self.filter.has_echo() {
            debug!("no echo with current mix/feedback; output is the scaled dry signal");
        }

        loop {
            let n = self.source.read(&mut self.block)?;
            if n == 0 {
                break;
            }

            let block = &mut self.block[..n];
            self.filter.process(block);
            self.sink.write(block)?;

            report.blocks += 1;
            report.samples += n as u64;
        }

        self.sink.finalize()?;
        report.frames = report.samples / channels;

        debug!(
            "delay loop finished: {} blocks, {} frames",
            report.blocks, report.frames
        );
        Ok(report)
    }

    pub fn filter(&self) -> &FeedbackDelay {
        &self.filter
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }
}

/// Human-readable parameter and stream dump printed in verbose mode.
pub struct StreamSummary<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub info: &'a AudioStreamInfo,
    pub filter: &'a FeedbackDelay,
}

impl fmt::Display for StreamSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ratios = self.filter.ratios();
        let frames = self
            .info
            .total_frames
            .map_or_else(|| "unknown".to_string(), |n| n.to_string());
        let duration = self
            .info
            .duration_sec()
            .map_or_else(|| "unknown".to_string(), |d| d.to_string());

        writeln!(f, "Sample Rate: {}", self.info.sample_rate)?;
        writeln!(f, "Frames: {}", frames)?;
        writeln!(f, "Channels: {}", self.info.channels)?;
        writeln!(f, "Duration: {}", duration)?;
        writeln!(f, "Input: {}", self.input.display())?;
        writeln!(f, "Output: {}", self.output.display())?;
        writeln!(f, "Delay Time: {}", ratios.delay_time_sec)?;
        writeln!(f, "Feedback: {}", ratios.feedback)?;
        writeln!(f, "Dry: {}", ratios.dry)?;
        writeln!(f, "Wet: {}", ratios.wet)?;
        writeln!(f, "Buffer Size: {}", self.filter.block_size())
    }
}

/// Reject delays longer than the input. Streams without a frame count are
/// let through.
pub fn check_duration(params: &EffectParameters, info: &AudioStreamInfo) -> DelayResult<()> {
    let delay_sec = params.ratios().delay_time_sec;
    match info.duration_sec() {
        Some(duration_sec) if delay_sec > duration_sec => Err(DelayError::DelayExceedsDuration {
            delay_sec,
            duration_sec,
        }),
        Some(_) => Ok(()),
        None => {
            tracing::warn!("input does not report its length; skipping duration check");
            Ok(())
        }
    }
}

/// Validate, check the stream and build the filter: everything that must
/// pass before an output is created.
fn prepare(
    params: &EffectParameters,
    limits: &DelayLimits,
    info: &AudioStreamInfo,
) -> DelayResult<FeedbackDelay> {
    check_duration(params, info)?;
    FeedbackDelay::new(params, info, limits)
}

/// Apply the delay to `input` and write a 16-bit PCM WAV to `output`.
///
/// Parameters are checked before any file is touched, and the output is only
/// created once the input has been opened and accepted.
pub fn apply_delay(
    input: &Path,
    output: &Path,
    params: &EffectParameters,
    limits: &DelayLimits,
) -> DelayResult<ProcessReport> {
    params.validate_with(limits)?;

    let source = FileSource::open(input)?;
    let info = *source.info();
    let filter = prepare(params, limits, &info)?;

    if params.verbose {
        crate::log_println!(
            "{}",
            StreamSummary {
                input,
                output,
                info: &info,
                filter: &filter,
            }
        );
    }

    let sink = WavSink::create(output, info.sample_rate, info.channels)?;
    let report = DelayProcessor::new(source, sink, filter).run()?;

    info!(
        "{} -> {}: {} frames in {} blocks",
        input.display(),
        output.display(),
        report.frames,
        report.blocks
    );
    Ok(report)
}

/// Apply the delay to an interleaved buffer already in memory.
pub fn process_buffer(
    samples: Vec<f32>,
    sample_rate: u32,
    channels: usize,
    params: &EffectParameters,
    limits: &DelayLimits,
) -> DelayResult<Vec<f32>> {
    params.validate_with(limits)?;

    let source = MemorySource::new(sample_rate, channels, samples);
    let filter = prepare(params, limits, source.info())?;

    let mut processor = DelayProcessor::new(source, MemorySink::new(), filter);
    processor.run()?;
    Ok(processor.into_sink().into_samples())
}
