use crate::common::DelayResult;

/// Stream layout reported by an opened source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioStreamInfo {
    pub sample_rate: u32,
    pub channels: usize,
    /// Frames in the stream, when the container reports it.
    pub total_frames: Option<u64>,
}

impl AudioStreamInfo {
    pub fn duration_sec(&self) -> Option<f32> {
        self.total_frames
            .map(|frames| frames as f32 / self.sample_rate as f32)
    }
}

/// Interleaved `f32` PCM producer.
pub trait SampleSource {
    fn info(&self) -> &AudioStreamInfo;

    /// Fill `buf` with up to `buf.len()` interleaved samples.
    ///
    /// Returns fewer than `buf.len()` only when the stream ends; `0` means
    /// the stream is exhausted.
    fn read(&mut self, buf: &mut [f32]) -> DelayResult<usize>;
}

/// Interleaved `f32` PCM consumer.
pub trait SampleSink {
    /// Append samples, in order.
    fn write(&mut self, samples: &[f32]) -> DelayResult<()>;

    /// Flush and close. Writing after this is an error.
    fn finalize(&mut self) -> DelayResult<()>;
}
