use serde::{Deserialize, Serialize};

use crate::audio::{
    constants::{DEFAULT_MAX_BUFFER_SAMPLES, MAX_DELAY_TIME_MS},
    params::{DelayLimits, EffectParameters},
};

/// `[delay]` section: the effect parameters plus resource caps.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DelayConfig {
    #[serde(flatten)]
    pub params: EffectParameters,
    pub max_delay_ms: u32,
    pub max_buffer_samples: usize,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            params: EffectParameters::default(),
            max_delay_ms: MAX_DELAY_TIME_MS as u32,
            max_buffer_samples: DEFAULT_MAX_BUFFER_SAMPLES,
        }
    }
}

impl DelayConfig {
    pub fn limits(&self) -> DelayLimits {
        DelayLimits {
            max_delay_ms: self.max_delay_ms,
            max_buffer_samples: self.max_buffer_samples,
        }
    }
}
