use super::{AudioFilter, delay_line::DelayLine};
use crate::audio::params::{DelayLimits, EffectParameters, MixRatios};
use crate::audio::source::AudioStreamInfo;
use crate::common::DelayResult;

/// Feedback echo over whole delay-length blocks.
///
/// Each output sample is the dry input plus the input summed with the
/// previous block's output at the same offset, scaled by mix and feedback:
///
/// ```text
/// out[i] = in[i] * dry + (in[i] + line[i]) * wet * feedback
/// ```
///
/// The output is then written back into the line, so echoes recirculate and
/// decay by `wet * feedback` per repeat. Nothing is clamped here.
pub struct FeedbackDelay {
    ratios: MixRatios,
    line: DelayLine,
}

impl FeedbackDelay {
    /// `params` must already be validated.
    pub fn new(
        params: &EffectParameters,
        info: &AudioStreamInfo,
        limits: &DelayLimits,
    ) -> DelayResult<Self> {
        let delay_ms = params.delay_time_ms.max(0) as u32;
        let size = DelayLine::block_size(info.sample_rate, info.channels, delay_ms);

        Ok(Self {
            ratios: params.ratios(),
            line: DelayLine::with_limit(size, limits.max_buffer_samples)?,
        })
    }

    pub fn ratios(&self) -> &MixRatios {
        &self.ratios
    }

    /// Samples per read; equal to the delay line length.
    pub fn block_size(&self) -> usize {
        self.line.len()
    }

    pub fn delay_line(&self) -> &DelayLine {
        &self.line
    }
}

impl AudioFilter for FeedbackDelay {
    fn process(&mut self, samples: &mut [f32]) {
        debug_assert!(samples.len() <= self.line.len());

        let MixRatios {
            dry, wet, feedback, ..
        } = self.ratios;

        for (sample, &delayed) in samples.iter_mut().zip(self.line.as_slice()) {
            let input = *sample;
            *sample = input * dry + (input + delayed) * wet * feedback;
        }

        self.line.fold(samples);
    }

    fn has_echo(&self) -> bool {
        self.ratios.wet > 0.0 && self.ratios.feedback > 0.0
    }

    fn reset(&mut self) {
        self.line.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(sample_rate: u32, channels: usize) -> AudioStreamInfo {
        AudioStreamInfo {
            sample_rate,
            channels,
            total_frames: None,
        }
    }

    fn delay(delay_time_ms: i32, feedback_pct: i32, mix_pct: i32) -> FeedbackDelay {
        let params = EffectParameters {
            delay_time_ms,
            feedback_pct,
            mix_pct,
            verbose: false,
        };
        FeedbackDelay::new(&params, &info(1000, 1), &DelayLimits::default()).unwrap()
    }

    #[test]
    fn block_size_follows_delay() {
        // 4 ms at 1 kHz
        assert_eq!(delay(4, 50, 50).block_size(), 4);
        assert_eq!(delay(0, 50, 50).block_size(), 1);
    }

    #[test]
    fn stereo_block_size_is_not_frame_rounded() {
        let params = EffectParameters {
            delay_time_ms: 255,
            ..EffectParameters::default()
        };
        let fx = FeedbackDelay::new(&params, &info(44_100, 2), &DelayLimits::default()).unwrap();
        assert_eq!(fx.block_size(), 22_491);
        assert_eq!(fx.delay_line().len(), 22_491);
    }

    #[test]
    fn first_block_mixes_with_silence() {
        let mut fx = delay(4, 50, 50);
        let mut block = [1.0, 0.0, -1.0, 0.5];
        fx.process(&mut block);
        assert_eq!(block, [0.75, 0.0, -0.75, 0.375]);
        assert_eq!(fx.delay_line().as_slice(), &block);
    }

    #[test]
    fn feedback_recirculates_output() {
        let mut fx = delay(4, 50, 50);
        let mut first = [1.0, 0.0, 0.0, 0.0];
        fx.process(&mut first);

        let mut second = [0.0; 4];
        fx.process(&mut second);
        assert_eq!(second, [0.1875, 0.0, 0.0, 0.0]);

        let mut third = [0.0; 4];
        fx.process(&mut third);
        assert_eq!(third[0], 0.1875 * 0.25);
    }

    #[test]
    fn dry_only_is_passthrough() {
        let mut fx = delay(4, 100, 0);
        assert!(!fx.has_echo());
        for _ in 0..3 {
            let input = [0.3, -0.7, 1.5, -2.0];
            let mut block = input;
            fx.process(&mut block);
            assert_eq!(block, input);
        }
    }

    #[test]
    fn zero_feedback_scales_by_dry() {
        let mut fx = delay(4, 0, 30);
        assert!(!fx.has_echo());
        for _ in 0..3 {
            let input = [0.3, -0.7, 1.0, 0.25];
            let mut block = input;
            fx.process(&mut block);
            for (out, inp) in block.iter().zip(input) {
                assert!((out - inp * 0.7).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn short_block_leaves_tail_of_line() {
        let mut fx = delay(4, 50, 50);
        let mut full = [1.0, 1.0, 1.0, 1.0];
        fx.process(&mut full);
        let mut short = [0.0, 0.0];
        fx.process(&mut short);

        assert_eq!(fx.delay_line().as_slice(), &[0.1875, 0.1875, 0.75, 0.75]);
    }

    #[test]
    fn output_is_not_clamped() {
        let mut fx = delay(4, 100, 100);
        let mut block = [1.0; 4];
        fx.process(&mut block);
        let mut again = [1.0; 4];
        fx.process(&mut again);
        assert_eq!(again[0], 2.0);
    }

    #[test]
    fn reset_silences_history() {
        let mut fx = delay(4, 50, 50);
        let mut block = [1.0; 4];
        fx.process(&mut block);
        fx.reset();
        let mut silent = [0.0; 4];
        fx.process(&mut silent);
        assert_eq!(silent, [0.0; 4]);
    }

    #[test]
    fn respects_buffer_limit() {
        let params = EffectParameters {
            delay_time_ms: 1000,
            ..EffectParameters::default()
        };
        let limits = DelayLimits {
            max_buffer_samples: 1000,
            ..DelayLimits::default()
        };
        assert!(FeedbackDelay::new(&params, &info(48_000, 2), &limits).is_err());
    }
}
