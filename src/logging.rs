//! Logging configuration using tracing

use std::path::PathBuf;

use anyhow::Result;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize logging to a daily rolling file; the terminal belongs to the UI.
///
/// Logs are written to `<data-local-dir>/preptime/logs/`. The level is
/// controlled by the `PREPTIME_LOG` environment variable:
///
/// ```bash
/// PREPTIME_LOG=debug preptime
/// ```
pub fn init() -> Result<PathBuf> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "preptime.log");

    let env_filter = EnvFilter::try_from_env("PREPTIME_LOG")
        .unwrap_or_else(|_| EnvFilter::new("preptime=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()?;

    tracing::info!(log_dir = %log_dir.display(), "preptime starting");
    Ok(log_dir)
}

fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("preptime")
        .join("logs")
}
