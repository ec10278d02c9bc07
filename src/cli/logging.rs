//! Verbosity-gated logging to stdout

/// Output verbosity, ordered from silent to chatty
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// No progress output
    Quiet,
    /// Per-trial progress
    Normal,
    /// Per-trial progress plus per-epoch detail
    Verbose,
}

/// Print `msg` when the configured `level` reaches `required`.
///
/// `required` is the verbosity a message needs; callers pass `Normal` or
/// `Verbose`, never `Quiet`.
pub fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if level >= required {
        println!("{msg}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Quiet < LogLevel::Normal);
        assert!(LogLevel::Normal < LogLevel::Verbose);
    }
}
