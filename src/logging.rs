//! Logging setup.
//!
//! Everything goes to stdout and to a daily-rotated file under the configured
//! log directory. The returned guard must live as long as the process or the
//! file writer stops flushing.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

pub const LOG_FILE_PREFIX: &str = "staffdesk.log";

pub fn init(config: &LoggingConfig) -> anyhow::Result<WorkerGuard> {
    let dir = Path::new(&config.dir);
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG wins over the configured level when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()?;

    Ok(guard)
}
