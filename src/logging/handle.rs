use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;

/// Handle для управления lifecycle логирования.
///
/// Держит guard файлового sink: пока handle жив, non-blocking writer
/// работает, при drop оставшиеся события сбрасываются в файл.
pub struct LoggingHandle {
    _file_guard: Option<WorkerGuard>,
    file_path: Option<PathBuf>,
}

impl LoggingHandle {
    pub fn new(
        file_guard: Option<WorkerGuard>,
        file_path: Option<PathBuf>,
    ) -> Self {
        Self {
            _file_guard: file_guard,
            file_path,
        }
    }

    /// Handle без файлового sink.
    pub fn console_only() -> Self {
        Self::new(None, None)
    }

    pub fn has_file_sink(&self) -> bool {
        self._file_guard.is_some()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Явное завершение: сбрасывает файловый буфер.
    pub fn shutdown(self) {
        tracing::debug!(file_sink = self.has_file_sink(), "logging shutdown");
        drop(self);
    }
}

impl std::fmt::Debug for LoggingHandle {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("LoggingHandle")
            .field("file_sink", &self.has_file_sink())
            .field("file_path", &self.file_path)
            .finish()
    }
}
