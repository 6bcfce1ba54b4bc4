use std::path::Path;

/// A generic boxed error type.
pub type AnyError = Box<dyn std::error::Error + Send + Sync>;

/// A convenient Result alias returning `AnyError`.
pub type AnyResult<T> = std::result::Result<T, AnyError>;

/// Input containers recognised when building a probe hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AudioFormat {
    Aac,
    Webm,
    Mp4,
    Mp3,
    Ogg,
    Flac,
    Wav,
    Aiff,
    Unknown,
}

impl AudioFormat {
    pub fn as_ext(&self) -> &'static str {
        match self {
            Self::Aac => "aac",
            Self::Webm => "webm",
            Self::Mp4 => "mp4",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
            Self::Wav => "wav",
            Self::Aiff => "aiff",
            Self::Unknown => "",
        }
    }

    pub fn as_mime(&self) -> Option<&'static str> {
        match self {
            Self::Aac => Some("audio/aac"),
            Self::Webm => Some("audio/webm"),
            Self::Mp4 => Some("audio/mp4"),
            Self::Mp3 => Some("audio/mpeg"),
            Self::Ogg => Some("audio/ogg"),
            Self::Flac => Some("audio/flac"),
            Self::Wav => Some("audio/wav"),
            Self::Aiff => Some("audio/aiff"),
            Self::Unknown => None,
        }
    }

    pub fn from_ext(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "aac" => Self::Aac,
            "webm" | "mka" | "mkv" => Self::Webm,
            "mp4" | "m4a" => Self::Mp4,
            "mp3" => Self::Mp3,
            "ogg" | "oga" | "opus" => Self::Ogg,
            "flac" => Self::Flac,
            "wav" | "wave" => Self::Wav,
            "aif" | "aiff" => Self::Aiff,
            _ => Self::Unknown,
        }
    }

    /// Guess the container from a file name's extension.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|s| s.to_str())
            .map(Self::from_ext)
            .unwrap_or(Self::Unknown)
    }
}
