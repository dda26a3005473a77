/// Excerpt parameters as supplied by the caller.
///
/// `length_seconds <= 0` selects the whole file. A negative `start_seconds`
/// centers the excerpt, but never further than `|start_seconds|` from the
/// beginning of the file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExcerptRequest {
    pub length_seconds: f32,
    pub start_seconds: f32,
}

impl ExcerptRequest {
    pub fn new(length_seconds: f32, start_seconds: f32) -> Self {
        Self {
            length_seconds,
            start_seconds,
        }
    }

    pub fn whole_file() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Resolves this request against a file of `duration_seconds`.
    pub fn resolve(&self, duration_seconds: f32) -> ResolvedExcerpt {
        ResolvedExcerpt::select(self, duration_seconds)
    }
}

impl Default for ExcerptRequest {
    fn default() -> Self {
        Self::whole_file()
    }
}

/// The window actually decoded: `[start_seconds, start_seconds + length_seconds)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedExcerpt {
    pub start_seconds: f32,
    pub length_seconds: f32,
}

impl ResolvedExcerpt {
    /// Computes the decode window for `request` within a file of
    /// `duration_seconds`.
    ///
    /// Rules, first match wins:
    /// 1. the length is clamped to the duration;
    /// 2. a non-positive length selects the whole file;
    /// 3. a negative start centers the window, capped at `|start|` seconds;
    /// 4. a window running past the end is shifted left to end at the duration;
    /// 5. otherwise the request is used as given.
    pub fn select(request: &ExcerptRequest, duration_seconds: f32) -> Self {
        let duration = duration_seconds.max(0.0);
        let length = request.length_seconds.min(duration);
        let start = request.start_seconds;

        if length <= 0.0 || length > duration {
            return Self::whole(duration);
        }

        if start < 0.0 {
            let centered = (duration - length) / 2.0;
            return Self {
                start_seconds: (-start).min(centered),
                length_seconds: length,
            };
        }

        if start + length > duration {
            let start = (duration - length).max(0.0);
            return Self {
                start_seconds: start,
                length_seconds: duration.min(duration - start),
            };
        }

        Self {
            start_seconds: start,
            length_seconds: length,
        }
    }

    fn whole(duration: f32) -> Self {
        Self {
            start_seconds: 0.0,
            length_seconds: duration,
        }
    }

    pub fn end_seconds(&self) -> f32 {
        self.start_seconds + self.length_seconds
    }

    pub fn is_empty(&self) -> bool {
        self.length_seconds <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::EXCERPT_TOLERANCE;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn resolve(duration: f32, length: f32, start: f32) -> ResolvedExcerpt {
        ExcerptRequest::new(length, start).resolve(duration)
    }

    // ── Rule table ──────────────────────────────────────────────────

    #[rstest]
    #[case::whole_file_on_zero_length(10.0, 0.0, 0.0, 0.0, 10.0)]
    #[case::whole_file_ignores_start(10.0, 0.0, 7.0, 0.0, 10.0)]
    #[case::whole_file_on_negative_length(10.0, -3.0, 2.0, 0.0, 10.0)]
    #[case::short_file_decodes_everything(3.0, 30.0, 0.0, 0.0, 3.0)]
    #[case::centering(10.0, 4.0, -100.0, 3.0, 4.0)]
    #[case::centering_capped_by_magnitude(10.0, 4.0, -1.5, 1.5, 4.0)]
    #[case::end_clamp(10.0, 4.0, 8.0, 6.0, 4.0)]
    #[case::start_beyond_end(10.0, 4.0, 50.0, 6.0, 4.0)]
    #[case::pass_through(10.0, 4.0, 2.0, 2.0, 4.0)]
    #[case::exact_fit(10.0, 4.0, 6.0, 6.0, 4.0)]
    fn test_rules(
        #[case] duration: f32,
        #[case] length: f32,
        #[case] start: f32,
        #[case] expected_start: f32,
        #[case] expected_length: f32,
    ) {
        let r = resolve(duration, length, start);
        assert_relative_eq!(r.start_seconds, expected_start);
        assert_relative_eq!(r.length_seconds, expected_length);
    }

    #[test]
    fn test_whole_file_fallback() {
        let r = resolve(42.5, 0.0, 0.0);
        assert_eq!(r.start_seconds, 0.0);
        assert_eq!(r.length_seconds, 42.5);
    }

    #[test]
    fn test_length_equal_to_duration_with_negative_start_starts_at_zero() {
        let r = resolve(10.0, 10.0, -5.0);
        assert_eq!(r.start_seconds, 0.0);
        assert_eq!(r.length_seconds, 10.0);
    }

    // ── Degenerate durations ────────────────────────────────────────

    #[test]
    fn test_zero_duration_yields_empty_excerpt() {
        let r = resolve(0.0, 30.0, -15.0);
        assert_eq!(r.start_seconds, 0.0);
        assert_eq!(r.length_seconds, 0.0);
        assert!(r.is_empty());
    }

    #[test]
    fn test_negative_duration_treated_as_zero() {
        let r = resolve(-2.0, 5.0, 1.0);
        assert_eq!(r.start_seconds, 0.0);
        assert_eq!(r.length_seconds, 0.0);
    }

    // ── Totality ────────────────────────────────────────────────────

    #[test]
    fn test_resolved_window_always_within_file() {
        let durations = [0.0, 0.01, 1.0, 3.3, 10.0, 61.7, 3600.0];
        let values = [
            -1.0e6, -100.0, -30.0, -4.5, -0.5, -0.0, 0.0, 0.25, 1.0, 2.0, 4.0, 9.99, 10.0, 30.0,
            1.0e6,
        ];

        for &duration in &durations {
            for &length in &values {
                for &start in &values {
                    let r = resolve(duration, length, start);
                    assert!(
                        r.start_seconds >= 0.0,
                        "start < 0 for d={duration} l={length} s={start}: {r:?}"
                    );
                    assert!(
                        r.start_seconds <= duration + EXCERPT_TOLERANCE,
                        "start > duration for d={duration} l={length} s={start}: {r:?}"
                    );
                    assert!(
                        r.length_seconds >= 0.0,
                        "negative length for d={duration} l={length} s={start}: {r:?}"
                    );
                    assert!(
                        r.end_seconds() <= duration + EXCERPT_TOLERANCE,
                        "window past end for d={duration} l={length} s={start}: {r:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_default_request_is_whole_file() {
        assert_eq!(ExcerptRequest::default(), ExcerptRequest::new(0.0, 0.0));
        let r = ExcerptRequest::default().resolve(12.0);
        assert_eq!(r.length_seconds, 12.0);
    }
}
