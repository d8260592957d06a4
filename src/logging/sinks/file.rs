use std::{fs, io, path::Path};

use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{layer::Layer as LayerTrait, registry::LookupSpan};

use crate::logging::{config::LoggingConfig, formatter};

/// Файловый layer без ANSI через non-blocking writer.
///
/// Guard должен жить, пока нужны логи: при его drop буфер сбрасывается.
pub fn layer_with_config<S>(
    config: &LoggingConfig,
    path: &Path,
) -> io::Result<(Box<dyn LayerTrait<S> + Send + Sync>, WorkerGuard)>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("log file path '{}' has no file name", path.display()),
        )
    })?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let appender = rolling::never(dir, file_name);
    let (writer, guard) = non_blocking(appender);
    let layer = formatter::build_with_writer(config, config.format, false, writer);
    Ok((layer, guard))
}
