//! In-memory source and sink for buffers that never touch the filesystem.

use super::traits::{AudioStreamInfo, SampleSink, SampleSource};
use crate::common::DelayResult;

/// Serves a fixed interleaved buffer, `read` by `read`.
pub struct MemorySource {
    info: AudioStreamInfo,
    samples: Vec<f32>,
    pos: usize,
}

impl MemorySource {
    pub fn new(sample_rate: u32, channels: usize, samples: Vec<f32>) -> Self {
        let frames = samples.len() / channels.max(1);
        Self {
            info: AudioStreamInfo {
                sample_rate,
                channels,
                total_frames: Some(frames as u64),
            },
            samples,
            pos: 0,
        }
    }
}

impl SampleSource for MemorySource {
    fn info(&self) -> &AudioStreamInfo {
        &self.info
    }

    fn read(&mut self, buf: &mut [f32]) -> DelayResult<usize> {
        let remaining = &self.samples[self.pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}

/// Collects everything written to it, keeping the block boundaries.
#[derive(Debug, Default)]
pub struct MemorySink {
    samples: Vec<f32>,
    block_lengths: Vec<usize>,
    finalized: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Length of every `write` call, in order.
    pub fn block_lengths(&self) -> &[usize] {
        &self.block_lengths
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

impl SampleSink for MemorySink {
    fn write(&mut self, samples: &[f32]) -> DelayResult<()> {
        debug_assert!(!self.finalized, "write after finalize");
        self.samples.extend_from_slice(samples);
        self.block_lengths.push(samples.len());
        Ok(())
    }

    fn finalize(&mut self) -> DelayResult<()> {
        self.finalized = true;
        Ok(())
    }
}
