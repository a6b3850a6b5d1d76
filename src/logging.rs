//! File logging. The terminal is owned by the UI, so events go to a daily
//! rolling file under the data directory instead of stdout.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "club-info-collector.log";
const DEFAULT_FILTER: &str = "club_info_collector=info";

/// Install the global subscriber. Keep the returned guard alive for the whole
/// run; dropping it flushes and stops the background writer.
pub fn init_logger(log_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir).context("failed to create log directory")?;

    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install logger: {err}"))?;

    Ok(guard)
}

/// Start file logging, or carry on without it. The warning goes to stderr,
/// which is visible again once the terminal UI exits.
pub fn init_logger_or_warn(log_dir: &Path) -> Option<WorkerGuard> {
    match init_logger(log_dir) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("warning: file logging disabled: {err:#}");
            None
        }
    }
}
