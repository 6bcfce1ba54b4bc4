//! Block-aligned history buffer for the feedback delay.
//!
//! Unlike a ring buffer with a moving write head, this line is exactly one
//! block long: sample `i` of the next block is mixed with sample `i` of the
//! previous block's output. Block length equals the delay length, so the
//! offset between the two is exactly the delay time.

use crate::common::{DelayError, DelayResult};

pub struct DelayLine {
    buffer: Vec<f32>,
}

impl DelayLine {
    /// Zero-filled line of `size` samples, never shorter than one.
    pub fn new(size: usize) -> Self {
        Self {
            buffer: vec![0.0; size.max(1)],
        }
    }

    /// Like [`new`](Self::new), refusing sizes above `limit`.
    pub fn with_limit(size: usize, limit: usize) -> DelayResult<Self> {
        if size > limit {
            return Err(DelayError::DelayLineTooLarge {
                requested: size,
                limit,
            });
        }
        Ok(Self::new(size))
    }

    /// Interleaved length of a line holding `delay_ms` of audio:
    /// `ceil(sample_rate * channels * delay_ms / 1000)` samples, at least one
    /// so a zero delay still makes progress.
    ///
    /// The count is per sample, not per frame. When it is not a multiple of
    /// `channels` the echo lands on a neighbouring channel slot.
    pub fn block_size(sample_rate: u32, channels: usize, delay_ms: u32) -> usize {
        let samples = (u64::from(sample_rate) * channels.max(1) as u64 * u64::from(delay_ms))
            .div_ceil(1000);
        usize::try_from(samples.max(1)).unwrap_or(usize::MAX)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.buffer
    }

    /// Store a block's output as the history for the next block.
    ///
    /// Only the first `output.len()` positions change; a short final block
    /// leaves the rest of the line as it was.
    pub fn fold(&mut self, output: &[f32]) {
        let n = output.len().min(self.buffer.len());
        self.buffer[..n].copy_from_slice(&output[..n]);
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
    }
}
