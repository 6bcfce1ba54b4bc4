use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::audio::constants::{INT16_MAX_F, INT16_MIN_F, OUTPUT_BITS_PER_SAMPLE};
use crate::audio::source::SampleSink;
use crate::common::{DelayError, DelayResult};

/// Convert a nominal `[-1.0, 1.0]` sample to 16-bit PCM.
///
/// The engine never clamps; values past full scale saturate here, at the
/// point of quantisation.
pub fn quantize(sample: f32) -> i16 {
    (sample * INT16_MAX_F).round().clamp(INT16_MIN_F, INT16_MAX_F) as i16
}

/// 16-bit PCM WAV writer with the input's rate and channel count.
pub struct WavSink {
    path: PathBuf,
    writer: Option<WavWriter<BufWriter<File>>>,
}

impl WavSink {
    pub fn create(path: impl AsRef<Path>, sample_rate: u32, channels: usize) -> DelayResult<Self> {
        let path = path.as_ref().to_path_buf();
        let create_err = |source: hound::Error| DelayError::SinkCreate {
            path: path.clone(),
            source,
        };

        let channels = u16::try_from(channels)
            .map_err(|_| create_err(hound::Error::Unsupported))?;
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: OUTPUT_BITS_PER_SAMPLE,
            sample_format: SampleFormat::Int,
        };
        let writer = WavWriter::create(&path, spec).map_err(create_err)?;

        Ok(Self {
            path,
            writer: Some(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_err(&self, source: hound::Error) -> DelayError {
        DelayError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl SampleSink for WavSink {
    fn write(&mut self, samples: &[f32]) -> DelayResult<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(self.write_err(hound::Error::IoError(std::io::Error::other(
                "write after finalize",
            ))));
        };

        let result = samples
            .iter()
            .try_for_each(|&sample| writer.write_sample(quantize(sample)));
        result.map_err(|e| self.write_err(e))
    }

    fn finalize(&mut self) -> DelayResult<()> {
        match self.writer.take() {
            Some(writer) => writer.finalize().map_err(|e| self.write_err(e)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_scales_and_saturates() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.0), 32_767);
        assert_eq!(quantize(-1.0), -32_767);
        assert_eq!(quantize(0.75), 24_575);
        assert_eq!(quantize(1.8), i16::MAX);
        assert_eq!(quantize(-3.0), i16::MIN);
    }

    #[test]
    fn writes_readable_pcm16() {
        let dir = std::env::temp_dir().join(format!("rustecho-wavsink-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.wav");

        let mut sink = WavSink::create(&path, 22_050, 2).unwrap();
        sink.write(&[0.5, -0.5, 0.25]).unwrap();
        sink.write(&[-0.25]).unwrap();
        sink.finalize().unwrap();
        assert!(sink.write(&[0.0]).is_err());

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 22_050);
        assert_eq!(spec.bits_per_sample, 16);
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![16_384, -16_384, 8_192, -8_192]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn empty_output_has_valid_header() {
        let dir = std::env::temp_dir().join(format!("rustecho-wavempty-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.wav");

        let mut sink = WavSink::create(&path, 44_100, 1).unwrap();
        sink.finalize().unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.len(), 0);
        assert_eq!(reader.spec().sample_rate, 44_100);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn create_in_missing_directory_fails() {
        let path = std::env::temp_dir()
            .join(format!("rustecho-missing-{}", std::process::id()))
            .join("nested")
            .join("out.wav");
        match WavSink::create(&path, 8000, 1) {
            Err(DelayError::SinkCreate { path: p, .. }) => assert_eq!(p, path),
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("expected SinkCreate"),
        }
    }
}
