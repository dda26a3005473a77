use std::path::Path;

use crate::decoding::domain::audio_decoder::AudioDecoder;
use crate::decoding::domain::decode_error::DecodeError;
use crate::decoding::domain::downmixer::{downmix_to_mono, is_supported_layout};
use crate::decoding::domain::excerpt::ExcerptRequest;
use crate::decoding::domain::resampler::{resample_to_target, Resampler};
use crate::decoding::infrastructure::decoder_registry::DecoderRegistry;
use crate::decoding::infrastructure::ffmpeg_resampler::FfmpegResampler;
use crate::shared::constants::{TARGET_CHANNELS, TARGET_SAMPLE_RATE};

/// Decodes audio files into canonical PCM: mono, 22050 Hz, f32.
///
/// Written once against the [`AudioDecoder`] contract, so backends only
/// supply open/info/seek/read. Each call opens its own handle and releases
/// it before returning, on success and on every error path.
pub struct CanonicalDecodeUseCase {
    decoder: Box<dyn AudioDecoder>,
    resampler: Box<dyn Resampler>,
}

impl CanonicalDecodeUseCase {
    pub fn new(decoder: Box<dyn AudioDecoder>, resampler: Box<dyn Resampler>) -> Self {
        Self { decoder, resampler }
    }

    /// Builds the use case with the named decoder (or the registry default)
    /// and the libswresample resampler.
    pub fn from_registry(
        registry: &DecoderRegistry,
        decoder_name: Option<&str>,
    ) -> Result<Self, DecodeError> {
        let decoder = match decoder_name {
            Some(name) => registry.require(name)?,
            None => registry
                .create_default()
                .ok_or_else(|| DecodeError::UnknownDecoder("<default>".to_string()))?,
        };
        Ok(Self::new(decoder, Box::new(FfmpegResampler)))
    }

    pub fn decoder_name(&self) -> &str {
        self.decoder.name()
    }

    /// Decodes `[start, start + length)` seconds of `path` to canonical PCM.
    ///
    /// `length_seconds <= 0` selects the whole file; a negative
    /// `start_seconds` centers the excerpt (see [`ExcerptRequest`]).
    pub fn decode_to_canonical_pcm(
        &self,
        path: &Path,
        length_seconds: f32,
        start_seconds: f32,
    ) -> Result<Vec<f32>, DecodeError> {
        self.decode_excerpt(path, &ExcerptRequest::new(length_seconds, start_seconds))
    }

    pub fn decode_excerpt(
        &self,
        path: &Path,
        request: &ExcerptRequest,
    ) -> Result<Vec<f32>, DecodeError> {
        // 1. Open; the handle is dropped on every return below
        let mut handle = self.decoder.open(path)?;
        let info = handle.info();
        log::debug!(
            "{}: {} channels, {} Hz, {:.3}s",
            self.decoder.name(),
            info.channels,
            info.sample_rate,
            info.duration_seconds
        );

        if !is_supported_layout(info.channels) {
            return Err(DecodeError::UnsupportedChannelLayout {
                channels: info.channels,
            });
        }

        // 2. Resolve the excerpt against the real duration
        let excerpt = request.resolve(info.duration_seconds);
        log::debug!(
            "{}: Will decode from {:.3}s to {:.3}s",
            self.decoder.name(),
            excerpt.start_seconds,
            excerpt.end_seconds()
        );

        // 3. Seek
        handle.seek(excerpt.start_seconds)?;

        // 4. Read; a short read at end of stream just shortens the result
        let frames = info.samples_for(excerpt.length_seconds) / info.channels as usize;
        let interleaved = handle.read(frames);
        drop(handle);

        let received = interleaved.len() / info.channels as usize;
        if received < frames {
            log::debug!("Stream ended early: {received} of {frames} frames");
        }

        // 5-6. Downmix and resample
        let pcm = self.normalize_pcm(interleaved, info.sample_rate, info.channels)?;
        log::trace!("Decoding {} finalized", path.display());
        Ok(pcm)
    }

    /// Converts interleaved PCM at `sample_rate` with `channels` channels to
    /// canonical PCM.
    pub fn normalize_pcm(
        &self,
        samples: Vec<f32>,
        sample_rate: f64,
        channels: u32,
    ) -> Result<Vec<f32>, DecodeError> {
        if channels > 1 {
            log::debug!("Will downmix audio from {channels} channels to mono");
        }
        let mono = downmix_to_mono(samples, channels)?;
        resample_to_target(self.resampler.as_ref(), mono, sample_rate)
    }

    /// Entry point for PCM the caller already holds as canonical
    /// (mono, 22050 Hz); returned without modification.
    pub fn canonical_from_pcm(&self, samples: Vec<f32>) -> Result<Vec<f32>, DecodeError> {
        self.normalize_pcm(samples, TARGET_SAMPLE_RATE, TARGET_CHANNELS)
    }
}
