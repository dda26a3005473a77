/// Stream properties reported by a decoder for one open file.
///
/// `channels` and `sample_rate` describe the PCM the decoder hands out from
/// `read`, which may differ from what is stored in the container (backends
/// fold surround sources down to stereo, for example).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AudioStreamInfo {
    pub duration_seconds: f32,
    pub channels: u32,
    pub sample_rate: f64,
}

impl AudioStreamInfo {
    /// Builds stream info, clamping a negative or NaN duration to zero.
    pub fn new(duration_seconds: f32, channels: u32, sample_rate: f64) -> Self {
        let duration_seconds = if duration_seconds.is_finite() && duration_seconds > 0.0 {
            duration_seconds
        } else {
            0.0
        };
        Self {
            duration_seconds,
            channels,
            sample_rate,
        }
    }

    /// Number of interleaved samples covering `length_seconds` of audio.
    pub fn samples_for(&self, length_seconds: f32) -> usize {
        let samples = (length_seconds as f64 * self.sample_rate * self.channels as f64).round();
        if samples.is_finite() && samples > 0.0 {
            samples as usize
        } else {
            0
        }
    }
}
