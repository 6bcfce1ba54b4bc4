//! Output encoders. Only 16-bit PCM WAV is produced.

pub mod wav;

pub use wav::{WavSink, quantize};
