pub mod constants;
pub mod demux;
pub mod filters;
pub mod params;
pub mod processor;
pub mod sink;
pub mod source;

pub use filters::{AudioFilter, DelayLine, FeedbackDelay};
pub use params::{DelayLimits, EffectParameters, MixRatios, in_range, validate};
pub use processor::{DelayProcessor, ProcessReport, StreamSummary, apply_delay, process_buffer};
pub use sink::WavSink;
pub use source::{AudioStreamInfo, FileSource, MemorySink, MemorySource, SampleSink, SampleSource};
