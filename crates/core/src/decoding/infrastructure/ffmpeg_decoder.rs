use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use ffmpeg_next::format::sample::Type as SampleType;
use ffmpeg_next::format::Sample;
use ffmpeg_next::util::frame::audio::Audio;
use ffmpeg_next::ChannelLayout;

use crate::decoding::domain::audio_decoder::{AudioDecoder, DecoderHandle};
use crate::decoding::domain::decode_error::DecodeError;
use crate::shared::constants::FFMPEG_DECODER_NAME;
use crate::shared::stream_info::AudioStreamInfo;

/// Container-level timestamps are expressed in microseconds.
const AV_TIME_BASE: f64 = 1_000_000.0;

/// Decodes audio files via ffmpeg-next (libavformat + libavcodec).
///
/// Output is interleaved f32 at the source sample rate with one channel for
/// mono sources and two for everything else; libswresample folds surround
/// layouts down to stereo.
pub struct FfmpegDecoder;

impl AudioDecoder for FfmpegDecoder {
    fn name(&self) -> &str {
        FFMPEG_DECODER_NAME
    }

    fn open(&self, path: &Path) -> Result<Box<dyn DecoderHandle>, DecodeError> {
        Ok(Box::new(FfmpegHandle::open(path)?))
    }
}

struct FfmpegHandle {
    path: PathBuf,
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Audio,
    converter: ffmpeg_next::software::resampling::Context,
    source_layout: ChannelLayout,
    stream_index: usize,
    /// Seconds per stream timestamp tick.
    time_base: f64,
    /// Stream start time in seconds; covers encoder priming on lossy codecs.
    start_offset: f64,
    info: AudioStreamInfo,
    pending: VecDeque<f32>,
    /// Stream time to trim decoded audio up to after a seek.
    skip_until: Option<f64>,
    finished: bool,
}

impl FfmpegHandle {
    fn open(path: &Path) -> Result<Self, DecodeError> {
        log::trace!("ffmpeg: Decoding {} started", path.display());
        ffmpeg_next::init().map_err(|e| open_failed(path, e))?;

        let ictx = ffmpeg_next::format::input(path).map_err(|e| match e {
            ffmpeg_next::Error::InvalidData => unsupported(path, e),
            other => open_failed(path, other),
        })?;

        let container_duration = ictx.duration();
        let (stream_index, time_base, stream_duration, start_time, decoder) = {
            let stream = ictx
                .streams()
                .best(ffmpeg_next::media::Type::Audio)
                .ok_or_else(|| DecodeError::UnsupportedFormat {
                    path: path.to_path_buf(),
                    source: "no audio stream found".into(),
                })?;

            let rate = stream.time_base();
            let time_base = if rate.denominator() != 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            };

            let codec_ctx =
                ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
                    .map_err(|e| unsupported(path, e))?;
            let decoder = codec_ctx
                .decoder()
                .audio()
                .map_err(|e| unsupported(path, e))?;

            (
                stream.index(),
                time_base,
                stream.duration(),
                stream.start_time(),
                decoder,
            )
        };

        let source_channels = decoder.channels() as u32;
        let sample_rate = decoder.rate();
        if source_channels == 0 || sample_rate == 0 {
            let reason = format!("stream reports {source_channels} channels at {sample_rate} Hz");
            return Err(DecodeError::FormatNegotiationFailed {
                path: path.to_path_buf(),
                source: reason.into(),
            });
        }

        let mut source_layout = decoder.channel_layout();
        if source_layout.is_empty() {
            source_layout = ChannelLayout::default(source_channels as i32);
        }
        let (target_layout, channels) = if source_channels == 1 {
            (ChannelLayout::MONO, 1)
        } else {
            (ChannelLayout::STEREO, 2)
        };

        let converter = ffmpeg_next::software::resampling::Context::get(
            decoder.format(),
            source_layout,
            sample_rate,
            Sample::F32(SampleType::Packed),
            target_layout,
            sample_rate,
        )
        .map_err(|e| DecodeError::FormatNegotiationFailed {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        let duration = duration_seconds(stream_duration, time_base, container_duration);
        let start_offset = if start_time > 0 {
            start_time as f64 * time_base
        } else {
            0.0
        };
        let info = AudioStreamInfo::new(duration as f32, channels, sample_rate as f64);

        log::debug!(
            "ffmpeg: {} source channels, {} Hz, {:.3}s, start offset {:.4}s",
            source_channels,
            sample_rate,
            info.duration_seconds,
            start_offset
        );

        Ok(Self {
            path: path.to_path_buf(),
            ictx,
            decoder,
            converter,
            source_layout,
            stream_index,
            time_base,
            start_offset,
            info,
            pending: VecDeque::new(),
            skip_until: None,
            finished: false,
        })
    }

    /// Decodes until converted samples are pending or the stream is exhausted.
    /// Returns false when no further audio can be produced.
    fn fill_pending(&mut self) -> bool {
        loop {
            self.drain_decoder();
            if !self.pending.is_empty() {
                return true;
            }
            if self.finished {
                return false;
            }
            self.feed_next_packet();
        }
    }

    fn feed_next_packet(&mut self) {
        loop {
            let Some((stream, packet)) = self.ictx.packets().next() else {
                if let Err(e) = self.decoder.send_eof() {
                    log::trace!("ffmpeg: flushing decoder failed: {e}");
                }
                self.finished = true;
                return;
            };

            if stream.index() != self.stream_index {
                continue;
            }

            match self.decoder.send_packet(&packet) {
                Ok(()) => return,
                Err(e) => log::warn!("ffmpeg: skipping undecodable packet: {e}"),
            }
        }
    }

    fn drain_decoder(&mut self) {
        let mut decoded = Audio::empty();
        while self.decoder.receive_frame(&mut decoded).is_ok() {
            let frame_start = decoded
                .timestamp()
                .or(decoded.pts())
                .map(|ts| ts as f64 * self.time_base);

            if decoded.channel_layout().is_empty() {
                decoded.set_channel_layout(self.source_layout);
            }

            let mut converted = Audio::empty();
            if let Err(e) = self.converter.run(&decoded, &mut converted) {
                log::warn!("ffmpeg: failed to convert decoded frame: {e}");
                continue;
            }

            let samples = interleaved_samples(&converted, self.info.channels as usize);
            self.push_converted(samples, frame_start);
        }
    }

    /// Queues converted samples, dropping whatever precedes a pending seek
    /// target so that seeks land on the exact requested frame.
    fn push_converted(&mut self, samples: Vec<f32>, frame_start: Option<f64>) {
        let channels = self.info.channels as usize;
        let skip_frames = match (self.skip_until, frame_start) {
            (Some(target), Some(start)) => {
                let frames = samples.len() / channels;
                let skip = frames_to_skip(target, start, frames, self.info.sample_rate);
                let Some(skip) = skip else {
                    return;
                };
                self.skip_until = None;
                skip
            }
            (Some(_), None) => {
                self.skip_until = None;
                0
            }
            (None, _) => 0,
        };
        self.pending.extend(samples.into_iter().skip(skip_frames * channels));
    }
}

impl DecoderHandle for FfmpegHandle {
    fn info(&self) -> AudioStreamInfo {
        self.info
    }

    fn seek(&mut self, position_seconds: f32) -> Result<(), DecodeError> {
        let target = seek_target(position_seconds, self.start_offset);
        let timestamp = (target * AV_TIME_BASE) as i64;

        self.ictx
            .seek(timestamp, ..timestamp)
            .map_err(|e| DecodeError::SeekFailed {
                position_seconds,
                source: e.into(),
            })?;

        self.decoder.flush();
        self.pending.clear();
        self.finished = false;
        self.skip_until = Some(target);
        Ok(())
    }

    fn read(&mut self, frame_count: usize) -> Vec<f32> {
        let wanted = frame_count * self.info.channels as usize;
        let mut out = Vec::with_capacity(wanted);

        while out.len() < wanted {
            if self.pending.is_empty() && !self.fill_pending() {
                break;
            }
            let take = (wanted - out.len()).min(self.pending.len());
            out.extend(self.pending.drain(..take));
        }

        if out.len() < wanted {
            log::debug!("ffmpeg: short read, {} of {} samples", out.len(), wanted);
        }
        out
    }
}

impl Drop for FfmpegHandle {
    fn drop(&mut self) {
        log::trace!("ffmpeg: Decoding {} finalized", self.path.display());
    }
}

/// Stream time for a content position; negative positions clamp to the start.
fn seek_target(position_seconds: f32, start_offset: f64) -> f64 {
    (position_seconds as f64).max(0.0) + start_offset
}

/// Leading frames to drop from a decoded frame starting at `frame_start` so
/// output resumes at `target`, or `None` when the whole frame precedes it.
fn frames_to_skip(
    target: f64,
    frame_start: f64,
    frames: usize,
    sample_rate: f64,
) -> Option<usize> {
    let ahead = ((target - frame_start) * sample_rate).round();
    if ahead >= frames as f64 {
        None
    } else {
        Some(ahead.max(0.0) as usize)
    }
}

/// Duration from the stream header, falling back to the container estimate.
fn duration_seconds(stream_duration: i64, time_base: f64, container_duration: i64) -> f64 {
    if stream_duration > 0 && time_base > 0.0 {
        stream_duration as f64 * time_base
    } else if container_duration > 0 {
        container_duration as f64 / AV_TIME_BASE
    } else {
        0.0
    }
}

/// Copies packed f32 samples out of a converted frame.
fn interleaved_samples(frame: &Audio, channels: usize) -> Vec<f32> {
    let byte_len = frame.samples() * channels * std::mem::size_of::<f32>();
    if byte_len == 0 {
        return Vec::new();
    }
    let Some(bytes) = frame.data(0).get(..byte_len) else {
        return Vec::new();
    };
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

fn open_failed(path: &Path, e: ffmpeg_next::Error) -> DecodeError {
    DecodeError::OpenFailed {
        path: path.to_path_buf(),
        source: e.into(),
    }
}

fn unsupported(path: &Path, e: ffmpeg_next::Error) -> DecodeError {
    DecodeError::UnsupportedFormat {
        path: path.to_path_buf(),
        source: e.into(),
    }
}
