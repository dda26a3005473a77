pub mod decoder_registry;
pub mod ffmpeg_decoder;
pub mod ffmpeg_resampler;
pub mod wav_decoder;
