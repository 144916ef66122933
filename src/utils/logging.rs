use tracing_subscriber::EnvFilter;

/// Filter directive for the given verbosity.
///
/// `base_level` comes from the config file; each `-v` raises it one step.
pub fn filter_directive(base_level: &str, verbosity: u8) -> String {
    const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

    let base = LEVELS
        .iter()
        .position(|level| *level == base_level)
        .unwrap_or(1);
    let level = LEVELS[(base + verbosity as usize).min(LEVELS.len() - 1)];
    format!("ant_downloader={}", level)
}

/// Install the global subscriber. `RUST_LOG` wins over the computed filter.
///
/// Logs go to stderr so they never interleave with prompt rendering on stdout.
pub fn init_tracing(base_level: &str, verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| filter_directive(base_level, verbosity).into());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive("warn", 0), "ant_downloader=warn");
        assert_eq!(filter_directive("warn", 1), "ant_downloader=info");
        assert_eq!(filter_directive("warn", 2), "ant_downloader=debug");
        assert_eq!(filter_directive("info", 9), "ant_downloader=trace");
        assert_eq!(filter_directive("bogus", 0), "ant_downloader=warn");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing("warn", 0);
        init_tracing("debug", 2);
    }
}
