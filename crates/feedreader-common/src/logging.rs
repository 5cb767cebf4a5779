//! Logging setup for feedreader binaries
//!
//! Library crates only emit `tracing` events. Binaries call [`init_logging`]
//! once to install a `tracing-subscriber` formatter. `RUST_LOG` overrides the
//! configured level when it is set.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

/// Minimum log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Debug = 0,
    #[default]
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    /// Convert to the lowercase directive understood by `EnvFilter`
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a log level string is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown log level: {0}")]
pub struct UnknownLogLevel(pub String);

impl FromStr for LogLevel {
    type Err = UnknownLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" | "trace" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(UnknownLogLevel(s.to_string())),
        }
    }
}

/// Logging configuration options
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Minimum log level
    pub level: LogLevel,
    /// Include the event target (module path) in each line
    pub with_target: bool,
}

impl LogOptions {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            with_target: false,
        }
    }
}

fn build_filter(options: &LogOptions) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(options.level.as_str()))
}

/// Install the global subscriber, writing to stderr.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging(options: LogOptions) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(&options))
        .with_target(options.with_target)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
