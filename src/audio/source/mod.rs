//! Sample sources and sinks — the I/O contract the delay engine runs against.
//!
//! # Module layout
//!
//! ```text
//! src/audio/source/
//! ├── mod.rs      ← re-exports
//! ├── traits.rs   ← SampleSource / SampleSink + AudioStreamInfo
//! ├── file.rs     ← FileSource (symphonia decode of any supported container)
//! └── memory.rs   ← MemorySource / MemorySink (buffers already in RAM)
//! ```
//!
//! The WAV writer lives in [`crate::audio::sink`].

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileSource;
pub use memory::{MemorySink, MemorySource};
pub use traits::{AudioStreamInfo, SampleSink, SampleSource};
