use super::decode_error::DecodeError;

/// Reduces interleaved PCM with `channels` channels to mono.
///
/// Mono input is returned untouched. Stereo frames are averaged; a trailing
/// partial frame is dropped. Other layouts have no defined mix and fail.
pub fn downmix_to_mono(samples: Vec<f32>, channels: u32) -> Result<Vec<f32>, DecodeError> {
    match channels {
        1 => Ok(samples),
        2 => Ok(samples
            .chunks_exact(2)
            .map(|frame| (frame[0] + frame[1]) / 2.0)
            .collect()),
        _ => Err(DecodeError::UnsupportedChannelLayout { channels }),
    }
}

/// True if `channels` can be reduced to mono by [`downmix_to_mono`].
pub fn is_supported_layout(channels: u32) -> bool {
    matches!(channels, 1 | 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stereo_frames_are_averaged() {
        let mono = downmix_to_mono(vec![1.0, -1.0, 0.5, 0.5], 2).unwrap();
        assert_eq!(mono.len(), 2);
        assert_relative_eq!(mono[0], 0.0);
        assert_relative_eq!(mono[1], 0.5);
    }

    #[test]
    fn test_mono_passes_through_unchanged() {
        let samples = vec![0.1, -0.2, 0.3];
        let mono = downmix_to_mono(samples.clone(), 1).unwrap();
        assert_eq!(mono, samples);
    }

    #[test]
    fn test_trailing_partial_frame_is_dropped() {
        let mono = downmix_to_mono(vec![0.2, 0.4, 1.0], 2).unwrap();
        assert_eq!(mono.len(), 1);
        assert_relative_eq!(mono[0], 0.3);
    }

    #[test]
    fn test_empty_input() {
        assert!(downmix_to_mono(Vec::new(), 2).unwrap().is_empty());
    }

    #[test]
    fn test_surround_is_rejected() {
        let err = downmix_to_mono(vec![0.0; 12], 6).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnsupportedChannelLayout { channels: 6 }
        ));
    }

    #[test]
    fn test_zero_channels_is_rejected() {
        assert!(downmix_to_mono(vec![0.0; 4], 0).is_err());
    }

    #[test]
    fn test_supported_layouts() {
        assert!(is_supported_layout(1));
        assert!(is_supported_layout(2));
        assert!(!is_supported_layout(0));
        assert!(!is_supported_layout(3));
    }
}
