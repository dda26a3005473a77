//! Decode-and-normalize pipeline producing canonical analysis PCM:
//! mono, 22050 Hz, 32-bit float samples, optionally limited to an excerpt.

pub mod decoding;
pub mod pipeline;
pub mod shared;
