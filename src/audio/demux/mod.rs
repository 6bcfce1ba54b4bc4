//! Demux layer — container sniffing and symphonia track selection.

pub mod format;

pub use format::detect_format;
use symphonia::core::{
    codecs::{CODEC_TYPE_NULL, Decoder, DecoderOptions},
    errors::Error,
    formats::{FormatOptions, FormatReader},
    io::{MediaSource, MediaSourceStream},
    meta::MetadataOptions,
    probe::Hint,
};

pub use crate::common::types::AudioFormat;

/// A probed container with its first decodable track and a decoder for it.
pub struct OpenedTrack {
    pub format: Box<dyn FormatReader>,
    pub track_id: u32,
    pub decoder: Box<dyn Decoder>,
    pub sample_rate: u32,
    pub channels: usize,
    pub n_frames: Option<u64>,
}

/// Probe `source` and pick the first track with a real codec.
///
/// Tracks that don't report a non-zero sample rate and channel count are an
/// unsupported layout.
pub fn open_format(source: Box<dyn MediaSource>, kind: Option<AudioFormat>) -> Result<OpenedTrack, Error> {
    let mss = MediaSourceStream::new(source, Default::default());

    let mut hint = Hint::new();
    if let Some(k) = &kind {
        let ext = k.as_ext();
        if !ext.is_empty() {
            hint.with_extension(ext);
        }
        if let Some(mime) = k.as_mime() {
            hint.mime_type(mime);
        }
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(Error::Unsupported("no audio track found"))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .filter(|&rate| rate > 0)
        .ok_or(Error::Unsupported("sample rate not reported"))?;
    let channels = track
        .codec_params
        .channels
        .map(|c| c.count())
        .filter(|&count| count > 0)
        .ok_or(Error::Unsupported("channel layout not reported"))?;
    let n_frames = track.codec_params.n_frames;

    let decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    Ok(OpenedTrack {
        format,
        track_id,
        decoder,
        sample_rate,
        channels,
        n_frames,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// 8 kHz mono 16-bit AIFF holding four frames.
    fn tiny_aiff() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"FORM");
        bytes.extend_from_slice(&54u32.to_be_bytes());
        bytes.extend_from_slice(b"AIFF");

        bytes.extend_from_slice(b"COMM");
        bytes.extend_from_slice(&18u32.to_be_bytes());
        bytes.extend_from_slice(&1i16.to_be_bytes());
        bytes.extend_from_slice(&4u32.to_be_bytes());
        bytes.extend_from_slice(&16i16.to_be_bytes());
        // 8000.0 as an 80-bit extended float
        bytes.extend_from_slice(&[0x40, 0x0B, 0xFA, 0, 0, 0, 0, 0, 0, 0]);

        bytes.extend_from_slice(b"SSND");
        bytes.extend_from_slice(&16u32.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        for sample in [1000i16, -1000, 0, 0] {
            bytes.extend_from_slice(&sample.to_be_bytes());
        }
        bytes
    }

    #[test]
    fn opens_aiff() {
        let bytes = tiny_aiff();
        assert_eq!(detect_format(&bytes[..12]), AudioFormat::Aiff);

        let opened = open_format(Box::new(Cursor::new(bytes)), Some(AudioFormat::Aiff)).unwrap();
        assert_eq!(opened.sample_rate, 8000);
        assert_eq!(opened.channels, 1);
    }

    #[test]
    fn rejects_unknown_bytes() {
        let bytes = vec![0x5Au8; 64];
        assert!(open_format(Box::new(Cursor::new(bytes)), None).is_err());
    }
}
