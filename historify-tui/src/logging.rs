//! File logging. The terminal belongs to the UI, so every event goes to a
//! daily-rolling file under the configured log directory.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use historify_core::config::LoggingConfig;

pub const LOG_FILE_PREFIX: &str = "historify.log";

/// `RUST_LOG` wins; otherwise the configured level applies.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Keep the guard alive until exit or
/// buffered lines are lost.
pub fn init(config: &LoggingConfig) -> Result<WorkerGuard> {
    let guard = init_in(&config.dir, &config.level)?;
    tracing::info!(dir = %config.dir.display(), level = %config.level, "logging initialized");
    Ok(guard)
}

fn init_in(dir: &Path, level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .with_filter(env_filter(level));

    Registry::default()
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_level_falls_back() {
        // Must not panic on a malformed directive.
        let _ = env_filter("not a [valid directive");
    }

    #[test]
    fn unwritable_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, "x").unwrap();
        let err = init_in(&file.join("logs"), "info").unwrap_err();
        assert!(err.to_string().contains("log directory"));
    }
}
