pub mod delay_line;
pub mod feedback_delay;

pub use delay_line::DelayLine;
pub use feedback_delay::FeedbackDelay;

/// Trait for block effects over interleaved `f32` PCM.
/// Buffer layout: `[c0, c1, .., cN, c0, c1, ..]`, frame after frame.
pub trait AudioFilter: Send {
    /// Process samples in-place.
    fn process(&mut self, samples: &mut [f32]);
    /// Whether past blocks feed into the output with the current settings.
    /// When false the filter may still apply a plain gain to the input.
    fn has_echo(&self) -> bool;
    /// Drop all internal history, as if no audio had been processed yet.
    fn reset(&mut self);
}
