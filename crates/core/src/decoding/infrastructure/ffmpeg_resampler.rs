use ffmpeg_next::format::sample::Type as SampleType;
use ffmpeg_next::format::Sample;
use ffmpeg_next::software::resampling;
use ffmpeg_next::util::frame::audio::Audio;
use ffmpeg_next::ChannelLayout;

use crate::decoding::domain::decode_error::{DecodeError, NativeError};
use crate::decoding::domain::resampler::Resampler;

/// Number of input samples handed to libswresample per call.
const CHUNK_SIZE: usize = 8192;

/// Headroom added to each output frame for samples buffered by the filter.
const OUTPUT_HEADROOM: usize = 256;

/// Mono sample-rate converter backed by libswresample.
pub struct FfmpegResampler;

impl Resampler for FfmpegResampler {
    fn resample(
        &self,
        samples: &[f32],
        from_rate: f64,
        to_rate: f64,
    ) -> Result<Vec<f32>, DecodeError> {
        let fail = |source: NativeError| DecodeError::ResampleFailed {
            from_rate,
            to_rate,
            source,
        };

        let (Some(input_rate), Some(output_rate)) = (to_hz(from_rate), to_hz(to_rate)) else {
            return Err(fail("sample rates must be positive and finite".into()));
        };

        if input_rate == output_rate || samples.is_empty() {
            return Ok(samples.to_vec());
        }

        ffmpeg_next::init().map_err(|e| fail(e.into()))?;

        let format = Sample::F32(SampleType::Packed);
        let mut context = resampling::Context::get(
            format,
            ChannelLayout::MONO,
            input_rate,
            format,
            ChannelLayout::MONO,
            output_rate,
        )
        .map_err(|e| fail(e.into()))?;

        let ratio = output_rate as f64 / input_rate as f64;
        let mut out = Vec::with_capacity((samples.len() as f64 * ratio).ceil() as usize);

        for chunk in samples.chunks(CHUNK_SIZE) {
            let mut input = Audio::new(format, chunk.len(), ChannelLayout::MONO);
            input.set_rate(input_rate);
            input.plane_mut::<f32>(0).copy_from_slice(chunk);

            let capacity = (chunk.len() as f64 * ratio).ceil() as usize + OUTPUT_HEADROOM;
            let mut output = Audio::new(format, capacity, ChannelLayout::MONO);
            context
                .run(&input, &mut output)
                .map_err(|e| fail(e.into()))?;
            out.extend_from_slice(output.plane::<f32>(0));
        }

        // Drain the samples still held back by the filter.
        loop {
            let mut output = Audio::new(format, CHUNK_SIZE, ChannelLayout::MONO);
            context.flush(&mut output).map_err(|e| fail(e.into()))?;
            if output.samples() == 0 {
                break;
            }
            out.extend_from_slice(output.plane::<f32>(0));
        }

        log::trace!(
            "Resampled {} samples at {input_rate} Hz into {} samples at {output_rate} Hz",
            samples.len(),
            out.len()
        );
        Ok(out)
    }
}

/// libswresample only accepts integral rates.
fn to_hz(rate: f64) -> Option<u32> {
    if rate.is_finite() && rate >= 1.0 && rate <= u32::MAX as f64 {
        Some(rate.round() as u32)
    } else {
        None
    }
}
