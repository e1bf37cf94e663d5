use anyhow::{Context, Result};
use runlog_common::constants::LOG_FILE_NAME;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, time::SystemTime},
    prelude::*,
    EnvFilter,
};

/// Installs the global subscriber. Output goes to stderr since stdout carries
/// module responses and dry-run records; `log_dir` adds a `runlog.log` file.
pub fn setup_logging(level: &str, log_dir: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .with_context(|| format!("Invalid log level '{}'", level))?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = log_dir.map(|dir| {
        let file_appender = RollingFileAppender::new(Rotation::NEVER, dir, LOG_FILE_NAME);
        fmt::layer()
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_target(true)
            .with_level(true)
            .with_ansi(false)
            .with_timer(SystemTime)
            .with_writer(file_appender)
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    if let Some(dir) = log_dir {
        tracing::debug!("Logging initialized. Writing to {}/{}", dir, LOG_FILE_NAME);
    }

    Ok(())
}
