//! Tracing setup.
//!
//! Headless commands log to stderr. The TUI owns the terminal, so it logs
//! to a daily rolling file under `<config_dir>/logs/` instead.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::branding::{APP_BINARY_NAME, LOG_FILTER_ENV};
use crate::config::Config;

/// Builds the filter from `KEYVIZ_LOG`, else `info` (or `debug` when verbose).
#[must_use]
pub fn env_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Logs to stderr, keeping stdout free for command output.
pub fn init_cli_logging(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

/// Directory the TUI writes its log files to.
pub fn log_dir() -> Result<PathBuf> {
    Ok(Config::config_dir()?.join("logs"))
}

/// Logs to `<dir>/keyviz.log.<date>`.
///
/// The returned guard flushes the writer when dropped and must live as long
/// as the application.
pub fn init_tui_logging(dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .context(format!("Failed to create log directory: {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(dir, format!("{APP_BINARY_NAME}.log"));
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let _ = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_thread_names(true),
        )
        .try_init();

    tracing::info!(dir = %dir.display(), "logging started");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_tui_logging_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("logs");
        let guard = init_tui_logging(&dir, false).unwrap();
        assert!(dir.is_dir());
        drop(guard);
    }
}
