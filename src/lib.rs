//! Offline feedback delay for PCM audio files.
//!
//! ```text
//! FileSource ──► FeedbackDelay ──► WavSink
//!  (symphonia)    (block = delay)    (hound, 16-bit PCM)
//! ```
//!
//! [`session::Session`] runs the chain over a list of input/output pairs;
//! [`audio::apply_delay`] runs it once.

pub mod audio;
pub mod common;
pub mod configs;
pub mod session;
