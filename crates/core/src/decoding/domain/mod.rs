pub mod audio_decoder;
pub mod decode_error;
pub mod downmixer;
pub mod excerpt;
pub mod resampler;
