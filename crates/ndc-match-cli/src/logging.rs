//! Logging setup using `tracing-subscriber`.
//!
//! The core library only emits `tracing` events; this module installs the
//! subscriber that writes them to stderr.
//!
//! # Log Levels
//!
//! - `warn`: Absorbed enrichment failures, replaced facility files
//! - `info`: Index and report summaries (default)
//! - `debug`: Per-facility indexing, enrichment decisions
//! - `trace`: Per-target, per-facility outcomes

use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::LogFormatArg;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormatArg,
    /// Whether to use ANSI colors in output.
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormatArg::Compact,
            with_ansi: io::stderr().is_terminal(),
        }
    }
}

impl LogConfig {
    /// - 0 (no `-v`): info level
    /// - 1 (`-v`): debug level
    /// - 2+ (`-vv`): trace level
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormatArg) -> Self {
        self.format = format;
        self
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = build_env_filter(config.level);
    match config.format {
        LogFormatArg::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr).with_target(false))
            .try_init(),
        LogFormatArg::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(io::stderr)
                    .with_ansi(config.with_ansi)
                    .with_target(false)
                    .without_time(),
            )
            .try_init(),
    }
}

/// `RUST_LOG` wins; otherwise our crates log at `level` and others at warn.
fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.as_str().to_lowercase();
        EnvFilter::new(format!("warn,ndc_match_core={level},ndc_report={level}"))
    })
}
