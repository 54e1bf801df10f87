use crate::error::ConfigError;
use crate::settings::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber: console output plus a plain-text
/// log file under `config.directory`.
///
/// `RUST_LOG` takes precedence over `config.filter`. The returned guard must be
/// held for the lifetime of the process, otherwise buffered file output is lost.
pub fn init_tracing(config: &LoggingConfig) -> Result<WorkerGuard, ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    std::fs::create_dir_all(&config.directory)
        .map_err(|e| ConfigError::Logging(format!("{}: {}", config.directory, e)))?;
    let file_appender = tracing_appender::rolling::never(&config.directory, &config.file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    tracing::info!("Logging setup complete.");
    Ok(guard)
}
