use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::project_dirs;

const LOG_FILE_PREFIX: &str = "sheet-explorer.log";

/// Where the daily log files go.
pub fn log_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_local_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn env_filter(default_level: &str) -> EnvFilter {
    build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(), default_level)
}

/// `RUST_LOG` wins, then the configured level, then `info`. Unparseable
/// directives fall through to the next choice.
fn build_filter(from_env: Option<&str>, default_level: &str) -> EnvFilter {
    from_env
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(default_level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Call once near the start of `main` and keep the guard alive until exit.
///
/// The terminal browser owns the screen, so it passes `to_stderr = false`
/// and only the rolling file gets events.
pub fn init(dir: &Path, default_level: &str, to_stderr: bool) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;

    let (file_writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, LOG_FILE_PREFIX));

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_filter(env_filter(default_level));

    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .with_filter(env_filter(default_level))
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(std::io::Error::other)?;

    Ok(guard)
}
