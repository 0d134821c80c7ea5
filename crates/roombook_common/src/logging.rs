//! Logging utilities for the roombook services.
//!
//! Installs a `tracing` subscriber with an `EnvFilter`, a console layer and,
//! when configured, a daily rolling log file.

use roombook_config::LoggingConfig;
use std::str::FromStr;
use tracing::{error, info, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILE_PREFIX: &str = "roombook.log";

/// Initialize the tracing subscriber at INFO.
///
/// ```
/// use roombook_common::logging;
///
/// logging::init();
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level for the
/// roombook crates. `RUST_LOG` still controls everything else.
pub fn init_with_level(level: Level) {
    let result = tracing_subscriber::registry()
        .with(console_layer())
        .with(build_filter(level))
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Initialize logging from the `logging` config section.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process. It is `None` when no directory is configured.
pub fn init_from_config(config: &LoggingConfig) -> Option<WorkerGuard> {
    let level = parse_level(config.level.as_deref());

    let (file_layer, guard) = match config.directory.as_deref() {
        Some(directory) => {
            let prefix = config.file_prefix.as_deref().unwrap_or(DEFAULT_FILE_PREFIX);
            let appender = tracing_appender::rolling::daily(directory, prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let result = tracing_subscriber::registry()
        .with(console_layer())
        .with(file_layer)
        .with(build_filter(level))
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
        if let Some(directory) = config.directory.as_deref() {
            info!("Writing log files to {}", directory);
        }
    }

    guard
}

fn console_layer<S>() -> fmt::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
}

fn build_filter(level: Level) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match format!("roombook={}", level).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Parses a level name such as "debug", falling back to INFO.
pub fn parse_level(level: Option<&str>) -> Level {
    match level {
        Some(name) => Level::from_str(name).unwrap_or_else(|_| {
            warn!("Unknown log level '{}', using INFO", name);
            Level::INFO
        }),
        None => Level::INFO,
    }
}

/// Log an error with context at the ERROR level.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}
