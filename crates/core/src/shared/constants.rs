/// Sample rate expected by the similarity analysis engine.
pub const TARGET_SAMPLE_RATE: f64 = 22050.0;

/// Canonical PCM is always mono.
pub const TARGET_CHANNELS: u32 = 1;

/// Floating tolerance (seconds) for excerpt boundary comparisons.
pub const EXCERPT_TOLERANCE: f32 = 1e-4;

/// Name of the ffmpeg-backed decoder in the default registry.
pub const FFMPEG_DECODER_NAME: &str = "ffmpeg";

/// Name of the pure-Rust WAV decoder in the default registry.
pub const WAV_DECODER_NAME: &str = "wav";
