//! Logging initialisation.
//!
//! Everything is logged through `tracing` to stderr, keeping stdout free for
//! action outputs and workflow commands.
//!
//! | Condition | Filter |
//! |-----------|--------|
//! | `RUST_LOG` set | `RUST_LOG` |
//! | `-v` or `RUNNER_DEBUG=1` | `debug` |
//! | otherwise | `info` |

use std::fmt;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Set to `1` by the runner when a workflow is re-run with debug logging.
pub const RUNNER_DEBUG_ENV: &str = "RUNNER_DEBUG";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Returns the format name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}', expected 'pretty' or 'json'")),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive.
    pub directive: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            directive: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Builds the configuration from `RUST_LOG`, `RUNNER_DEBUG` and the
    /// verbose flag.
    #[must_use]
    pub fn from_env(format: LogFormat, verbose: bool) -> Self {
        let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let runner_debug = std::env::var(RUNNER_DEBUG_ENV).is_ok_and(|v| v.trim() == "1");
        Self {
            format,
            directive: resolve_directive(rust_log.as_deref(), verbose || runner_debug),
        }
    }
}

/// Picks the filter directive: explicit `RUST_LOG`, else `debug` or `info`.
#[must_use]
pub fn resolve_directive(rust_log: Option<&str>, debug: bool) -> String {
    match rust_log.map(str::trim).filter(|v| !v.is_empty()) {
        Some(directive) => directive.to_string(),
        None if debug => "debug".to_string(),
        None => "info".to_string(),
    }
}

/// Installs the global subscriber.
///
/// An unparsable directive falls back to `info`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_new(&config.directive).unwrap_or_else(|_| EnvFilter::new("info"));

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true),
            )
            .with(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .with(filter)
            .try_init(),
    }
}
