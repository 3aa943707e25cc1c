use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::ChronoLocal, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::LogConfig;

const LOG_FILE_PREFIX: &str = "prodpic.log";

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. The returned guard
/// flushes the file sink on drop and must be kept alive by the caller.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;
    let timer = ChronoLocal::rfc_3339();

    let (file_layer, guard) = match &config.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_timer(timer.clone())
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if config.json {
        registry
            .with(fmt::layer().json().with_timer(timer))
            .try_init()?;
    } else {
        registry.with(fmt::layer().with_timer(timer)).try_init()?;
    }

    Ok(guard)
}
