/*
[INPUT]:  Log level from the CLI, debug toggle and optional log directory from config
[OUTPUT]: Global tracing subscriber (console plus optional daily file)
[POS]:    Observability layer - process-wide logging setup
[UPDATE]: When changing log outputs or formats
*/

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE_PREFIX: &str = "zoo-farm.log";

/// Effective filter directive; the debug toggle wins over the CLI level
pub fn filter_directive(log_level: &str, debug: bool) -> &str {
    if debug { "debug" } else { log_level }
}

/// Install the subscriber; keep the returned guard alive to flush the file writer
pub fn init_tracing(log_level: &str, debug: bool, file_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_new(filter_directive(log_level, debug)).context("invalid log level")?;

    let (file_layer, guard) = match file_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;

    Ok(guard)
}
