use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Quiet,
    Normal,
    Verbose,
}

static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Quiet as u8);

pub fn set_log_level(level: LogLevel) {
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn log_level() -> LogLevel {
    match LOG_LEVEL.load(Ordering::Relaxed) {
        0 => LogLevel::Quiet,
        1 => LogLevel::Normal,
        _ => LogLevel::Verbose,
    }
}

/// Environment variable holding the log level.
pub const LOG_ENV: &str = "XVCK_LOG";

impl LogLevel {
    /// Level named by `XVCK_LOG`, quiet when unset.
    pub fn from_env() -> Self {
        std::env::var(LOG_ENV)
            .map(|v| Self::parse(&v))
            .unwrap_or(LogLevel::Quiet)
    }

    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "info" | "1" => LogLevel::Normal,
            "verbose" | "2" => LogLevel::Verbose,
            _ => LogLevel::Quiet,
        }
    }
}

// stdout stays empty: every line goes to stderr.

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if $crate::utils::log_level() >= $crate::utils::LogLevel::Normal {
            eprintln!("[xvck] {}", format_args!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! log_verbose {
    ($($arg:tt)*) => {
        if $crate::utils::log_level() == $crate::utils::LogLevel::Verbose {
            eprintln!("[xvck] {}", format_args!($($arg)*));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse() {
        assert_eq!(LogLevel::parse(""), LogLevel::Quiet);
        assert_eq!(LogLevel::parse("info"), LogLevel::Normal);
        assert_eq!(LogLevel::parse(" Verbose "), LogLevel::Verbose);
        assert_eq!(LogLevel::parse("2"), LogLevel::Verbose);
        assert_eq!(LogLevel::parse("loud"), LogLevel::Quiet);
        assert!(LogLevel::Verbose > LogLevel::Normal);
    }

    #[test]
    fn test_set_level() {
        set_log_level(LogLevel::Verbose);
        assert_eq!(log_level(), LogLevel::Verbose);
        set_log_level(LogLevel::Quiet);
        assert_eq!(log_level(), LogLevel::Quiet);
    }
}
