//! Effect parameters, their validation and the ratios derived from them.

use serde::{Deserialize, Serialize};

use crate::audio::constants::{
    DEFAULT_DELAY_TIME_MS, DEFAULT_FEEDBACK_PCT, DEFAULT_MAX_BUFFER_SAMPLES, DEFAULT_MIX_PCT,
    MAX_DELAY_TIME_MS, MAX_PERCENT, MIN_DELAY_TIME_MS, MIN_PERCENT,
};
use crate::common::{DelayError, DelayResult, ParamField};

/// User-facing delay settings. Integer milliseconds and percentages, as
/// entered; nothing derived is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectParameters {
    pub delay_time_ms: i32,
    pub feedback_pct: i32,
    pub mix_pct: i32,
    pub verbose: bool,
}

impl Default for EffectParameters {
    fn default() -> Self {
        Self {
            delay_time_ms: DEFAULT_DELAY_TIME_MS,
            feedback_pct: DEFAULT_FEEDBACK_PCT,
            mix_pct: DEFAULT_MIX_PCT,
            verbose: false,
        }
    }
}

/// Single-precision ratios the engine works with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixRatios {
    pub delay_time_sec: f32,
    pub feedback: f32,
    pub dry: f32,
    pub wet: f32,
}

/// Resource caps applied on top of the fixed parameter ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayLimits {
    /// Longest accepted delay; never above [`MAX_DELAY_TIME_MS`].
    pub max_delay_ms: u32,
    /// Longest delay line, in interleaved samples.
    pub max_buffer_samples: usize,
}

impl Default for DelayLimits {
    fn default() -> Self {
        Self {
            max_delay_ms: MAX_DELAY_TIME_MS as u32,
            max_buffer_samples: DEFAULT_MAX_BUFFER_SAMPLES,
        }
    }
}

/// Inclusive bounds check: `low <= x <= high`.
pub fn in_range<T: PartialOrd>(low: T, high: T, x: T) -> bool {
    low <= x && x <= high
}

fn check(field: ParamField, value: i32, min: i32, max: i32) -> DelayResult<()> {
    if in_range(min, max, value) {
        Ok(())
    } else {
        Err(DelayError::InvalidParameter {
            field,
            value: value.into(),
            min: min.into(),
            max: max.into(),
        })
    }
}

/// Check the three user parameters against their ranges, in order.
pub fn validate(delay_time_ms: i32, feedback_pct: i32, mix_pct: i32) -> DelayResult<()> {
    check(
        ParamField::DelayTime,
        delay_time_ms,
        MIN_DELAY_TIME_MS,
        MAX_DELAY_TIME_MS,
    )?;
    check(ParamField::Feedback, feedback_pct, MIN_PERCENT, MAX_PERCENT)?;
    check(ParamField::Mix, mix_pct, MIN_PERCENT, MAX_PERCENT)
}

impl EffectParameters {
    pub fn validate(&self) -> DelayResult<()> {
        validate(self.delay_time_ms, self.feedback_pct, self.mix_pct)
    }

    /// [`validate`](Self::validate), then apply the configured delay cap.
    pub fn validate_with(&self, limits: &DelayLimits) -> DelayResult<()> {
        self.validate()?;
        let cap = i32::try_from(limits.max_delay_ms)
            .unwrap_or(MAX_DELAY_TIME_MS)
            .min(MAX_DELAY_TIME_MS);
        check(ParamField::DelayTime, self.delay_time_ms, MIN_DELAY_TIME_MS, cap)
    }

    pub fn ratios(&self) -> MixRatios {
        let wet = self.mix_pct as f32 / 100.0;
        MixRatios {
            delay_time_sec: self.delay_time_ms as f32 / 1000.0,
            feedback: self.feedback_pct as f32 / 100.0,
            dry: 1.0 - wet,
            wet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(result: DelayResult<()>) -> ParamField {
        match result {
            Err(DelayError::InvalidParameter { field, .. }) => field,
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn accepts_every_bound() {
        for delay in [0, 1, 500, 999, 1000] {
            for pct in [0, 50, 100] {
                assert!(validate(delay, pct, pct).is_ok(), "{delay} {pct}");
            }
        }
    }

    #[test]
    fn rejects_out_of_range_naming_field() {
        assert_eq!(field_of(validate(1001, 50, 50)), ParamField::DelayTime);
        assert_eq!(field_of(validate(-1, 50, 50)), ParamField::DelayTime);
        assert_eq!(field_of(validate(500, 101, 50)), ParamField::Feedback);
        assert_eq!(field_of(validate(500, -5, 50)), ParamField::Feedback);
        assert_eq!(field_of(validate(500, 50, 101)), ParamField::Mix);
        assert_eq!(field_of(validate(500, 50, -1)), ParamField::Mix);
    }

    #[test]
    fn reports_value_and_bounds() {
        match validate(500, 50, 250) {
            Err(DelayError::InvalidParameter { value, min, max, .. }) => {
                assert_eq!((value, min, max), (250, 0, 100));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn in_range_is_inclusive_for_any_ordered_type() {
        assert!(in_range(0, 10, 0));
        assert!(in_range(0, 10, 10));
        assert!(!in_range(0, 10, 11));
        assert!(in_range(-1.5_f32, 1.5, 1.5));
        assert!(!in_range('a', 'f', 'g'));
    }

    #[test]
    fn defaults_match_documented_values() {
        let params = EffectParameters::default();
        assert_eq!(params.delay_time_ms, 500);
        assert_eq!(params.feedback_pct, 50);
        assert_eq!(params.mix_pct, 50);
        assert!(!params.verbose);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn ratios_are_derived() {
        let params = EffectParameters {
            delay_time_ms: 250,
            feedback_pct: 40,
            mix_pct: 25,
            verbose: false,
        };
        let ratios = params.ratios();
        assert_eq!(ratios.delay_time_sec, 0.25);
        assert!((ratios.feedback - 0.4).abs() < 1e-6);
        assert_eq!(ratios.wet, 0.25);
        assert_eq!(ratios.dry, 0.75);
    }

    #[test]
    fn configured_cap_tightens_delay_range() {
        let limits = DelayLimits {
            max_delay_ms: 200,
            ..DelayLimits::default()
        };
        let ok = EffectParameters {
            delay_time_ms: 200,
            ..EffectParameters::default()
        };
        let too_long = EffectParameters {
            delay_time_ms: 201,
            ..EffectParameters::default()
        };

        assert!(ok.validate_with(&limits).is_ok());
        match too_long.validate_with(&limits) {
            Err(DelayError::InvalidParameter { field, max, .. }) => {
                assert_eq!(field, ParamField::DelayTime);
                assert_eq!(max, 200);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
