// Logging setup for the binary

use tracing::Level;

/// Map a level name to a tracing level, defaulting to `info`
pub fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Level chosen from CLI flags; an explicit `--log-level` wins
pub fn level_from_flags(log_level: Option<&str>, verbose: u8, quiet: bool) -> Level {
    if let Some(name) = log_level {
        return parse_level(name);
    }
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the stderr subscriber
///
/// Stdout stays reserved for command output.
pub fn init_logging(level: Level) {
    use tracing_subscriber::fmt;

    let detailed = level >= Level::DEBUG;
    // ignore the error when a subscriber is already installed
    let _ = fmt()
        .with_max_level(level)
        .with_target(detailed)
        .with_file(detailed)
        .with_line_number(detailed)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("loud"), Level::INFO);
    }

    #[test]
    fn test_level_from_flags() {
        assert_eq!(level_from_flags(None, 0, false), Level::WARN);
        assert_eq!(level_from_flags(None, 2, false), Level::DEBUG);
        assert_eq!(level_from_flags(None, 7, false), Level::TRACE);
        assert_eq!(level_from_flags(None, 2, true), Level::ERROR);
        assert_eq!(level_from_flags(Some("trace"), 0, true), Level::TRACE);
    }
}
