use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Лимиты движка массивов.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecSettings {
    /// Максимум размерностей в текстовой и бинарной форме.
    pub max_dimensions: usize,
    /// Максимум элементов в одном массиве.
    pub max_elements: usize,
    /// Глубина разворачивания обёрток и альтернативных целей.
    pub max_unwrap_depth: usize,
}

pub const DEFAULT_MAX_DIMENSIONS: usize = 6;
pub const DEFAULT_MAX_ELEMENTS: usize = 134_217_727;
pub const DEFAULT_MAX_UNWRAP_DEPTH: usize = 8;

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            max_dimensions: DEFAULT_MAX_DIMENSIONS,
            max_elements: DEFAULT_MAX_ELEMENTS,
            max_unwrap_depth: DEFAULT_MAX_UNWRAP_DEPTH,
        }
    }
}

impl CodecSettings {
    /// Загружает настройки: значения по умолчанию, затем необязательный
    /// toml-файл, затем переменные окружения `PGARRAY_*`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("max_dimensions", DEFAULT_MAX_DIMENSIONS as u64)?
            .set_default("max_elements", DEFAULT_MAX_ELEMENTS as u64)?
            .set_default("max_unwrap_depth", DEFAULT_MAX_UNWRAP_DEPTH as u64)?;

        if let Some(p) = path {
            builder = builder.add_source(File::from(p).required(false));
        }

        let cfg = builder
            .add_source(Environment::with_prefix("PGARRAY").try_parsing(true))
            .build()?;

        let settings: Self = cfg.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Нулевые лимиты делают движок бесполезным.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("max_dimensions", self.max_dimensions),
            ("max_elements", self.max_elements),
            ("max_unwrap_depth", self.max_unwrap_depth),
        ] {
            if value == 0 {
                return Err(ConfigError::Message(format!("{name} must be greater than 0")));
            }
        }
        Ok(())
    }
}
