use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by a decoding backend's native library.
#[derive(Error, Debug)]
pub enum NativeError {
    #[error(transparent)]
    Ffmpeg(#[from] ffmpeg_next::Error),
    #[error(transparent)]
    Wav(#[from] hound::Error),
    #[error("{0}")]
    Message(String),
}

impl From<String> for NativeError {
    fn from(message: String) -> Self {
        NativeError::Message(message)
    }
}

impl From<&str> for NativeError {
    fn from(message: &str) -> Self {
        NativeError::Message(message.to_string())
    }
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to open {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: NativeError,
    },
    #[error("unsupported format in {path}: {source}")]
    UnsupportedFormat {
        path: PathBuf,
        #[source]
        source: NativeError,
    },
    #[error("decoder cannot produce float PCM for {path}: {source}")]
    FormatNegotiationFailed {
        path: PathBuf,
        #[source]
        source: NativeError,
    },
    #[error("failed to seek to {position_seconds:.3}s: {source}")]
    SeekFailed {
        position_seconds: f32,
        #[source]
        source: NativeError,
    },
    #[error("unsupported channel layout: {channels} channels (expected 1 or 2)")]
    UnsupportedChannelLayout { channels: u32 },
    #[error("resampling from {from_rate} Hz to {to_rate} Hz failed: {source}")]
    ResampleFailed {
        from_rate: f64,
        to_rate: f64,
        #[source]
        source: NativeError,
    },
    #[error("unknown decoder: {0}")]
    UnknownDecoder(String),
}

/// Pipeline phase a [`DecodeError`] originated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodePhase {
    Select,
    Open,
    Seek,
    Downmix,
    Resample,
}

impl DecodeError {
    pub fn phase(&self) -> DecodePhase {
        match self {
            DecodeError::UnknownDecoder(_) => DecodePhase::Select,
            DecodeError::OpenFailed { .. }
            | DecodeError::UnsupportedFormat { .. }
            | DecodeError::FormatNegotiationFailed { .. } => DecodePhase::Open,
            DecodeError::SeekFailed { .. } => DecodePhase::Seek,
            DecodeError::UnsupportedChannelLayout { .. } => DecodePhase::Downmix,
            DecodeError::ResampleFailed { .. } => DecodePhase::Resample,
        }
    }
}
