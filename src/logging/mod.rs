pub mod config;
mod filters;
mod formatter;
pub mod handle;
pub mod sinks;

pub use config::{LogFormat, LoggingConfig};
pub use handle::LoggingHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

/// Ошибка инициализации логирования.
pub type InitError = Box<dyn std::error::Error + Send + Sync>;

/// Инициализация глобального подписчика с конфигурацией.
///
/// `RUST_LOG` имеет приоритет над уровнем из конфигурации. Повторный вызов
/// возвращает ошибку.
pub fn init_logging(mut config: LoggingConfig) -> Result<LoggingHandle, InitError> {
    config.apply_env_overrides();
    config.validate()?;

    let env_filter = filters::build_filter_from_config(&config);
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    layers.push(sinks::console::layer_with_config(&config));

    let file_guard = match &config.file {
        Some(path) => {
            let (file_layer, guard) = sinks::file::layer_with_config(&config, path)?;
            layers.push(file_layer);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        format = %config.format,
        file = ?config.file,
        "Logging system initialized"
    );

    Ok(LoggingHandle::new(file_guard, config.file))
}
