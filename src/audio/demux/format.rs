//! Container detection from leading bytes, for inputs without a usable
//! file extension.

use crate::common::types::AudioFormat;

/// Bytes needed by [`detect_format`] to recognise every entry.
pub const SNIFF_LEN: usize = 12;

/// Sniff the container format from the first bytes of a file.
pub fn detect_format(header: &[u8]) -> AudioFormat {
    if header.len() < 4 {
        return AudioFormat::Unknown;
    }

    let form_type = |tag: &[u8]| header.len() >= SNIFF_LEN && &header[8..12] == tag;

    if header.starts_with(b"RIFF") && form_type(b"WAVE") {
        return AudioFormat::Wav;
    }
    if header.starts_with(b"FORM") && (form_type(b"AIFF") || form_type(b"AIFC")) {
        return AudioFormat::Aiff;
    }
    if header.starts_with(b"fLaC") {
        return AudioFormat::Flac;
    }
    if header.starts_with(b"OggS") {
        return AudioFormat::Ogg;
    }
    // EBML magic (Matroska / WebM)
    if header.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return AudioFormat::Webm;
    }
    if header.len() >= 8 && &header[4..8] == b"ftyp" {
        return AudioFormat::Mp4;
    }
    if header.starts_with(b"ID3") {
        return AudioFormat::Mp3;
    }
    // MPEG audio frame sync: 11 set bits
    if header[0] == 0xFF && (header[1] & 0xE0) == 0xE0 {
        return AudioFormat::Mp3;
    }

    AudioFormat::Unknown
}
