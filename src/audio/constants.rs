//! Central constants for the delay pipeline.
//!
//! Parameter bounds, defaults and PCM scale factors live here so the
//! validator, the engine and the WAV sink agree on them.

// ── Effect parameters ────────────────────────────────────────────────────────

pub const MIN_DELAY_TIME_MS: i32 = 0;
pub const MAX_DELAY_TIME_MS: i32 = 1_000;

pub const MIN_PERCENT: i32 = 0;
pub const MAX_PERCENT: i32 = 100;

pub const DEFAULT_DELAY_TIME_MS: i32 = 500;
pub const DEFAULT_FEEDBACK_PCT: i32 = 50;
pub const DEFAULT_MIX_PCT: i32 = 50;

// ── Delay line sizing ────────────────────────────────────────────────────────

/// Upper bound on delay line length in samples: 1 s at 384 kHz × 8 channels
/// (≈ 12 MB of f32).
pub const DEFAULT_MAX_BUFFER_SAMPLES: usize = 384_000 * 8;

// ── Output encoding ──────────────────────────────────────────────────────────

/// Output WAV bit depth.
pub const OUTPUT_BITS_PER_SAMPLE: u16 = 16;

pub const INT16_MAX_F: f32 = 32_767.0;
pub const INT16_MIN_F: f32 = -32_768.0;
