use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::MonitoringConfig;

/// Initialize structured logging.
///
/// In terminal-scoreboard mode logs go to `logs/goalhorn.log` instead of
/// stdout, which the TUI owns. The returned guard must be held for the
/// process lifetime or buffered log lines are dropped.
pub fn init_logging(config: &MonitoringConfig, log_to_file: bool) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if log_to_file {
        std::fs::create_dir_all("logs").context("Failed to create logs directory")?;
        let appender = tracing_appender::rolling::never("logs", "goalhorn.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_writer(writer)
            .with_target(true)
            .init();

        Ok(Some(guard))
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .init();

        Ok(None)
    }
}
