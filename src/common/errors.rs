use std::{fmt, io, path::PathBuf};

use symphonia::core::errors::Error as SymphoniaError;
use thiserror::Error;

/// Effect parameter named by [`DelayError::InvalidParameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamField {
    DelayTime,
    Feedback,
    Mix,
}

impl ParamField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DelayTime => "delay time",
            Self::Feedback => "feedback",
            Self::Mix => "mix",
        }
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything that can abort a single delay invocation.
#[derive(Debug, Error)]
pub enum DelayError {
    /// A delay/feedback/mix value outside its inclusive range.
    #[error("{field} must be between {min} and {max} (got {value})")]
    InvalidParameter {
        field: ParamField,
        value: i64,
        min: i64,
        max: i64,
    },

    /// The input could not be opened, probed, or has an unsupported layout.
    #[error("cannot open input {}: {source}", .path.display())]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: SymphoniaError,
    },

    /// The output WAV could not be created.
    #[error("cannot create output {}: {source}", .path.display())]
    SinkCreate {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("delay of {delay_sec}s exceeds input duration of {duration_sec}s")]
    DelayExceedsDuration { delay_sec: f32, duration_sec: f32 },

    #[error("delay line of {requested} samples exceeds the limit of {limit}")]
    DelayLineTooLarge { requested: usize, limit: usize },

    /// Mid-stream decode failure.
    #[error("read failed on {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: SymphoniaError,
    },

    /// Mid-stream encode or I/O failure on the output.
    #[error("write failed on {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("cannot create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DelayError {
    /// Whether the failure happened after the output file was created, i.e.
    /// a partial file may be left on disk.
    pub fn left_partial_output(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Write { .. })
    }
}

pub type DelayResult<T> = std::result::Result<T, DelayError>;

/// Failures while locating, reading or checking the TOML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config.toml or config.default.toml not found")]
    NotFound,

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
