use std::path::Path;

use super::decode_error::DecodeError;
use crate::shared::stream_info::AudioStreamInfo;

/// Domain interface for a native audio backend.
///
/// A decoder is a cheap, stateless capability: all per-file state lives in
/// the [`DecoderHandle`] returned by `open`.
pub trait AudioDecoder: Send + Sync {
    /// Registry name of this backend.
    fn name(&self) -> &str;

    /// Opens `path` and negotiates interleaved f32 output with one or two
    /// channels at the source sample rate.
    fn open(&self, path: &Path) -> Result<Box<dyn DecoderHandle>, DecodeError>;
}

/// One open audio file.
///
/// Owns exactly one native resource, released when the handle is dropped.
/// A handle is used from one thread at a time.
pub trait DecoderHandle {
    /// Stream properties; fixed for the lifetime of the handle.
    fn info(&self) -> AudioStreamInfo;

    /// Absolute seek in content seconds. Any codec priming offset is applied
    /// by the backend.
    fn seek(&mut self, position_seconds: f32) -> Result<(), DecodeError>;

    /// Reads up to `frame_count` interleaved frames.
    ///
    /// Keeps pulling from the stream until the request is filled or the
    /// stream stops making progress; a short result marks end of stream.
    fn read(&mut self, frame_count: usize) -> Vec<f32>;
}
