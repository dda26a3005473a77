use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::decoding::domain::audio_decoder::{AudioDecoder, DecoderHandle};
use crate::decoding::domain::decode_error::DecodeError;
use crate::shared::constants::WAV_DECODER_NAME;
use crate::shared::stream_info::AudioStreamInfo;

/// Pure-Rust RIFF/WAVE decoder backed by hound.
///
/// Handles integer PCM up to 32 bits and 32-bit float. Channels are reported
/// as stored in the file; there is no priming offset, so seeks are exact.
pub struct WavDecoder;

impl AudioDecoder for WavDecoder {
    fn name(&self) -> &str {
        WAV_DECODER_NAME
    }

    fn open(&self, path: &Path) -> Result<Box<dyn DecoderHandle>, DecodeError> {
        Ok(Box::new(WavHandle::open(path)?))
    }
}

struct WavHandle {
    path: PathBuf,
    reader: hound::WavReader<BufReader<File>>,
    spec: hound::WavSpec,
    info: AudioStreamInfo,
}

impl WavHandle {
    fn open(path: &Path) -> Result<Self, DecodeError> {
        log::trace!("wav: Decoding {} started", path.display());

        let reader = hound::WavReader::open(path).map_err(|e| {
            let path = path.to_path_buf();
            match &e {
                hound::Error::IoError(_) => DecodeError::OpenFailed {
                    path,
                    source: e.into(),
                },
                hound::Error::FormatError(_) | hound::Error::Unsupported => {
                    DecodeError::UnsupportedFormat {
                        path,
                        source: e.into(),
                    }
                }
                _ => DecodeError::FormatNegotiationFailed {
                    path,
                    source: e.into(),
                },
            }
        })?;

        let spec = reader.spec();
        check_sample_format(path, &spec)?;

        let duration = reader.duration() as f32 / spec.sample_rate as f32;
        let info = AudioStreamInfo::new(duration, spec.channels as u32, spec.sample_rate as f64);

        log::debug!(
            "wav: {} channels, {} Hz, {}-bit {:?}, {:.3}s",
            spec.channels,
            spec.sample_rate,
            spec.bits_per_sample,
            spec.sample_format,
            info.duration_seconds
        );

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            spec,
            info,
        })
    }
}

impl DecoderHandle for WavHandle {
    fn info(&self) -> AudioStreamInfo {
        self.info
    }

    fn seek(&mut self, position_seconds: f32) -> Result<(), DecodeError> {
        let total_frames = self.reader.duration();
        let frame = (position_seconds.max(0.0) as f64 * self.info.sample_rate).round();
        let frame = (frame as u64).min(total_frames as u64) as u32;

        self.reader
            .seek(frame)
            .map_err(|e| DecodeError::SeekFailed {
                position_seconds,
                source: hound::Error::IoError(e).into(),
            })
    }

    fn read(&mut self, frame_count: usize) -> Vec<f32> {
        let channels = self.spec.channels as usize;
        let wanted = frame_count * channels;

        let mut samples = match self.spec.sample_format {
            hound::SampleFormat::Float => {
                take_samples(self.reader.samples::<f32>(), wanted, |s| s)
            }
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1i64 << (self.spec.bits_per_sample - 1)) as f32;
                take_samples(self.reader.samples::<i32>(), wanted, |s| s as f32 * scale)
            }
        };

        samples.truncate(samples.len() - samples.len() % channels);
        samples
    }
}

impl Drop for WavHandle {
    fn drop(&mut self) {
        log::trace!("wav: Decoding {} finalized", self.path.display());
    }
}

/// Only 32-bit float and 1..=32-bit integer samples convert to f32 losslessly.
fn check_sample_format(path: &Path, spec: &hound::WavSpec) -> Result<(), DecodeError> {
    let supported = spec.channels > 0
        && spec.sample_rate > 0
        && match spec.sample_format {
            hound::SampleFormat::Float => spec.bits_per_sample == 32,
            hound::SampleFormat::Int => (1..=32).contains(&spec.bits_per_sample),
        };

    if supported {
        Ok(())
    } else {
        Err(DecodeError::FormatNegotiationFailed {
            path: path.to_path_buf(),
            source: format!(
                "{} channels, {} Hz, {}-bit {:?}",
                spec.channels, spec.sample_rate, spec.bits_per_sample, spec.sample_format
            )
            .into(),
        })
    }
}

/// Pulls up to `wanted` samples, stopping early at end of data or on the
/// first read error.
fn take_samples<T>(
    samples: impl Iterator<Item = hound::Result<T>>,
    wanted: usize,
    convert: impl Fn(T) -> f32,
) -> Vec<f32> {
    let mut out = Vec::with_capacity(wanted);
    for sample in samples.take(wanted) {
        match sample {
            Ok(s) => out.push(convert(s)),
            Err(e) => {
                log::warn!("wav: stopping read after {} samples: {e}", out.len());
                break;
            }
        }
    }
    out
}
