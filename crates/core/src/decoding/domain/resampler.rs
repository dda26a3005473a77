use super::decode_error::DecodeError;
use crate::shared::constants::TARGET_SAMPLE_RATE;

/// Domain interface for sample-rate conversion of mono PCM.
pub trait Resampler: Send + Sync {
    /// Converts `samples` from `from_rate` to `to_rate`.
    ///
    /// The output holds roughly `samples.len() * to_rate / from_rate`
    /// samples. Equal rates must return an unmodified copy.
    fn resample(
        &self,
        samples: &[f32],
        from_rate: f64,
        to_rate: f64,
    ) -> Result<Vec<f32>, DecodeError>;
}

/// Brings mono PCM at `from_rate` to the canonical sample rate.
///
/// The resampler is only consulted when the rates differ; otherwise the
/// buffer is returned as is.
pub fn resample_to_target(
    resampler: &dyn Resampler,
    samples: Vec<f32>,
    from_rate: f64,
) -> Result<Vec<f32>, DecodeError> {
    if from_rate == TARGET_SAMPLE_RATE {
        return Ok(samples);
    }
    log::debug!(
        "Will resample {} samples from {from_rate} Hz to {TARGET_SAMPLE_RATE} Hz",
        samples.len()
    );
    resampler.resample(&samples, from_rate, TARGET_SAMPLE_RATE)
}
