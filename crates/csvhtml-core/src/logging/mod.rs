//! Structured logging for csvhtml.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSONL when running under a supervisor
//!
//! # Design Notes
//!
//! - stdout is reserved for the rendered document in single-shot mode
//! - stderr receives all log output (human or JSONL)

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose events pass the default filter.
const LOG_TARGETS: &[&str] = &["csvhtml", "csvhtml_core", "csvhtml_render"];

/// Build the event filter: `RUST_LOG` directives win, otherwise our own
/// crates at the configured level and everything else at `warn`.
fn build_filter(config: &LogConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = LevelFilter::from(config.level);
    let directives: Vec<String> = std::iter::once("warn".to_string())
        .chain(LOG_TARGETS.iter().map(|t| format!("{t}={level}")))
        .collect();
    EnvFilter::new(directives.join(","))
}

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs.
pub fn init_logging(config: &LogConfig) {
    let filter = build_filter(config);

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .init();
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .flatten_event(true);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .init();
        }
    }
}

/// Initialize logging with defaults (for tests and simple cases).
///
/// Safe to call repeatedly; only the first call installs a subscriber.
pub fn init_default_logging() {
    let config = LogConfig::from_env(None, None);
    let _ = tracing_subscriber::registry()
        .with(build_filter(&config))
        .with(fmt::layer().with_test_writer().without_time())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.format, LogFormat::Human);
        assert_eq!(config.level, LogLevel::Info);
    }

    #[test]
    fn test_init_default_logging_is_idempotent() {
        init_default_logging();
        init_default_logging();
        tracing::info!("logging initialised twice without panicking");
    }
}
