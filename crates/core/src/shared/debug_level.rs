use log::LevelFilter;

/// Highest meaningful debug level (trace).
pub const MAX_DEBUG_LEVEL: u8 = 5;

/// Maps the numeric debug level scale onto a `log` filter.
///
/// 0 quiet, 1 error, 2 warning, 3 info, 4 debug, 5 trace. Anything above 5
/// is treated as trace.
pub fn level_filter_for_debug_level(level: u8) -> LevelFilter {
    match level {
        0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::quiet(0, LevelFilter::Off)]
    #[case::error(1, LevelFilter::Error)]
    #[case::warning(2, LevelFilter::Warn)]
    #[case::info(3, LevelFilter::Info)]
    #[case::debug(4, LevelFilter::Debug)]
    #[case::trace(5, LevelFilter::Trace)]
    fn test_level_mapping(#[case] level: u8, #[case] expected: LevelFilter) {
        assert_eq!(level_filter_for_debug_level(level), expected);
    }

    #[test]
    fn test_levels_above_max_clamp_to_trace() {
        assert_eq!(
            level_filter_for_debug_level(MAX_DEBUG_LEVEL + 1),
            LevelFilter::Trace
        );
        assert_eq!(level_filter_for_debug_level(u8::MAX), LevelFilter::Trace);
    }
}
