//! Structured logging setup.
//!
//! Stdout carries protocol traffic, so console output always goes to stderr.
//! An optional file sink receives the same events without ANSI colors.

use std::fs::{File, OpenOptions};
use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ServerConfig;

/// Keeps the background file writer alive; drop it last to flush.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &ServerConfig) -> anyhow::Result<LogGuard> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level_directive(&config.log_level)?)
            .with_context(|| format!("Invalid log level '{}'", config.log_level))?,
    };

    let console_layer = config.console_log.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    let (file_layer, guard) = match &config.log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(path) = &config.log_file {
        tracing::info!(log_file = %path.display(), "File logging enabled");
    }

    Ok(LogGuard { _file: guard })
}

/// Turn a user-facing level name into a filter directive.
///
/// A bare word that is not a level would otherwise parse as a target name and
/// silence everything, so it is rejected. Strings with `=` or `,` pass through
/// as full directives.
pub fn level_directive(level: &str) -> anyhow::Result<String> {
    let trimmed = level.trim();
    let lower = trimmed.to_ascii_lowercase();
    match lower.as_str() {
        "critical" | "fatal" => Ok("error".to_string()),
        "warning" => Ok("warn".to_string()),
        "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(lower),
        _ if trimmed.contains('=') || trimmed.contains(',') => Ok(trimmed.to_string()),
        _ => anyhow::bail!(
            "Unknown log level '{level}' (expected trace, debug, info, warn, error, critical or off)"
        ),
    }
}

/// Open (creating parents as needed) a log file in append mode.
pub fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_level_aliases() {
        assert_eq!(level_directive("critical").unwrap(), "error");
        assert_eq!(level_directive("CRITICAL").unwrap(), "error");
        assert_eq!(level_directive("fatal").unwrap(), "error");
        assert_eq!(level_directive("Warning").unwrap(), "warn");
        assert_eq!(level_directive(" debug ").unwrap(), "debug");
    }

    #[test]
    fn test_critical_filters_at_error() {
        let filter = EnvFilter::try_new(level_directive("critical").unwrap()).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
    }

    #[test]
    fn test_directives_pass_through() {
        assert_eq!(
            level_directive("mcp_stdio_server=debug,wire=trace").unwrap(),
            "mcp_stdio_server=debug,wire=trace"
        );
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let err = level_directive("verbose").unwrap_err();
        assert!(err.to_string().contains("Unknown log level 'verbose'"));
    }

    #[test]
    fn test_open_log_file_creates_parents_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/server.log");

        let mut first = open_log_file(&path).unwrap();
        writeln!(first, "one").unwrap();
        drop(first);

        let mut second = open_log_file(&path).unwrap();
        writeln!(second, "two").unwrap();
        drop(second);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "one\ntwo\n");
    }

    #[test]
    fn test_open_log_file_fails_on_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_log_file(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to open log file"));
    }
}
