//! `FileSource` — decodes a local audio file to interleaved `f32` blocks.

use std::{
    fs::File,
    io::{ErrorKind, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};

use symphonia::core::{
    audio::SampleBuffer, codecs::Decoder, errors::Error, formats::FormatReader,
};
use tracing::{debug, warn};

use super::traits::{AudioStreamInfo, SampleSource};
use crate::audio::demux::{AudioFormat, OpenedTrack, detect_format, format::SNIFF_LEN, open_format};
use crate::common::{DelayError, DelayResult};

/// Reads any container symphonia can probe, handing out exactly the number
/// of samples asked for until the stream runs dry.
pub struct FileSource {
    path: PathBuf,
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    info: AudioStreamInfo,
    sample_buf: Option<SampleBuffer<f32>>,
    /// Decoded samples not yet handed out; `pending[pending_pos..]` is live.
    pending: Vec<f32>,
    pending_pos: usize,
    finished: bool,
}

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> DelayResult<Self> {
        let path = path.as_ref().to_path_buf();
        let open_err = |source: Error| DelayError::SourceOpen {
            path: path.clone(),
            source,
        };

        let mut file = File::open(&path).map_err(|e| open_err(Error::IoError(e)))?;

        let mut kind = AudioFormat::from_path(&path);
        if kind == AudioFormat::Unknown {
            kind = sniff(&mut file).map_err(|e| open_err(Error::IoError(e)))?;
        }

        let OpenedTrack {
            format,
            track_id,
            decoder,
            sample_rate,
            channels,
            n_frames,
        } = open_format(Box::new(file), Some(kind)).map_err(open_err)?;

        debug!(
            "FileSource: opened {} as {:?} — {}Hz {}ch {:?} frames",
            path.display(),
            kind,
            sample_rate,
            channels,
            n_frames
        );

        Ok(Self {
            path,
            format,
            decoder,
            track_id,
            info: AudioStreamInfo {
                sample_rate,
                channels,
                total_frames: n_frames,
            },
            sample_buf: None,
            pending: Vec::new(),
            pending_pos: 0,
            finished: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode packets until one yields samples. Returns `false` at end of
    /// stream.
    fn decode_next(&mut self) -> DelayResult<bool> {
        while !self.finished {
            let packet = match self.format.next_packet() {
                Ok(p) => p,
                Err(Error::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => {
                    self.finished = true;
                    break;
                }
                Err(source) => {
                    return Err(DelayError::Read {
                        path: self.path.clone(),
                        source,
                    });
                }
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            match self.decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    let needed = decoded.capacity() * spec.channels.count();
                    let mut buf = match self.sample_buf.take() {
                        Some(buf) if buf.capacity() >= needed => buf,
                        _ => SampleBuffer::<f32>::new(decoded.capacity() as u64, spec),
                    };

                    buf.copy_interleaved_ref(decoded);
                    self.pending.clear();
                    self.pending.extend_from_slice(buf.samples());
                    self.pending_pos = 0;
                    self.sample_buf = Some(buf);

                    if !self.pending.is_empty() {
                        return Ok(true);
                    }
                }
                Err(Error::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => {
                    self.finished = true;
                }
                Err(Error::DecodeError(e)) => {
                    warn!("{}: skipping undecodable packet: {e}", self.path.display());
                }
                Err(source) => {
                    return Err(DelayError::Read {
                        path: self.path.clone(),
                        source,
                    });
                }
            }
        }

        Ok(false)
    }
}

impl SampleSource for FileSource {
    fn info(&self) -> &AudioStreamInfo {
        &self.info
    }

    fn read(&mut self, buf: &mut [f32]) -> DelayResult<usize> {
        let mut filled = 0;

        while filled < buf.len() {
            if self.pending_pos == self.pending.len() && !self.decode_next()? {
                break;
            }

            let available = &self.pending[self.pending_pos..];
            let n = available.len().min(buf.len() - filled);
            buf[filled..filled + n].copy_from_slice(&available[..n]);
            filled += n;
            self.pending_pos += n;
        }

        Ok(filled)
    }
}

/// Peek at the file header, then rewind.
fn sniff(file: &mut File) -> std::io::Result<AudioFormat> {
    let mut header = [0u8; SNIFF_LEN];
    let mut len = 0;
    while len < header.len() {
        match file.read(&mut header[len..])? {
            0 => break,
            n => len += n,
        }
    }
    file.seek(SeekFrom::Start(0))?;
    Ok(detect_format(&header[..len]))
}
