use std::{env, fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

/// Формат вывода событий.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Настройки логирования.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Уровень для событий крейта (`trace`..`error`).
    pub level: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub with_target: bool,
    /// Файл для копии логов. `None` — только консоль (stderr).
    pub file: Option<PathBuf>,
}

const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            with_ansi: true,
            with_target: true,
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Переменные `PGARRAY_LOG_*` перекрывают значения конфигурации.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("PGARRAY_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(format) = env::var("PGARRAY_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.format = f;
            }
        }
        if let Ok(ansi) = env::var("PGARRAY_LOG_ANSI") {
            self.with_ansi = matches!(ansi.as_str(), "1" | "true" | "yes");
        }
        if let Ok(path) = env::var("PGARRAY_LOG_FILE") {
            self.file = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let level = self.level.to_ascii_lowercase();
        if !LEVELS.contains(&level.as_str()) {
            return Err(format!(
                "invalid log level '{}', expected one of {LEVELS:?}",
                self.level
            ));
        }
        if let Some(path) = &self.file {
            if path.file_name().is_none() {
                return Err(format!("log file path '{}' has no file name", path.display()));
            }
        }
        Ok(())
    }

    /// Директива для `EnvFilter`: чужие крейты только с `warn`.
    pub fn build_filter_directive(&self) -> String {
        let level = self.level.to_ascii_lowercase();
        format!("warn,pgarray={level},pgarray_error={level}")
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Compact => write!(f, "compact"),
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}
