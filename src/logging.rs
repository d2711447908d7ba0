//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Diagnostics go to stderr so they never mix with the command output on
//! stdout.
//!
//! # Log Levels
//!
//! - `warn`: per-file compression failures (default)
//! - `info`: pipeline stages and summary counts (`-v`)
//! - `debug`: shell transitions, ignored events, cache decisions (`-vv`)
//! - `trace`: everything (`-vvv`)
//!
//! `RUST_LOG` overrides the verbosity flag entirely.

use std::io;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level for this crate when `RUST_LOG` is unset.
    pub level: Level,
    /// Whether to use ANSI colors in output.
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    /// - 0 (no `-v`): warn
    /// - 1 (`-v`): info
    /// - 2 (`-vv`): debug
    /// - 3+ (`-vvv`): trace
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }
}

/// Install the global subscriber: compact, no timestamps, on stderr.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), TryInitError> {
    let layer = fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_ansi(config.with_ansi)
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(build_env_filter(config.level))
        .with(layer)
        .try_init()
}

/// `RUST_LOG` if set and valid, otherwise `warn` for dependencies and
/// `level` for this crate.
fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

fn default_directives(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    format!("warn,folio={level}")
}
