use std::{fmt, sync::Arc};

use crate::{
    config::CodecSettings,
    registry::{default_registry, TypeLookup},
};

/// Всё, что нужно операциям кодирования и конвертации помимо самого
/// значения: источник идентификаторов типов и лимиты.
#[derive(Clone)]
pub struct CodecContext {
    pub lookup: Arc<dyn TypeLookup>,
    pub settings: CodecSettings,
}

impl CodecContext {
    pub fn new(
        lookup: Arc<dyn TypeLookup>,
        settings: CodecSettings,
    ) -> Self {
        Self { lookup, settings }
    }

    /// Контекст с теми же типами, но другими лимитами.
    pub fn with_settings(
        mut self,
        settings: CodecSettings,
    ) -> Self {
        self.settings = settings;
        self
    }
}

/// Общий реестр встроенных типов и лимиты по умолчанию.
impl Default for CodecContext {
    fn default() -> Self {
        Self::new(default_registry(), CodecSettings::default())
    }
}

impl fmt::Debug for CodecContext {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("CodecContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;

    #[test]
    fn test_default_context_resolves_builtins() {
        let ctx = CodecContext::default();
        assert_eq!(ctx.lookup.resolve("text").unwrap(), 25);
        assert_eq!(ctx.settings, CodecSettings::default());
    }

    #[test]
    fn test_custom_lookup_and_settings() {
        let registry = Arc::new(TypeRegistry::new());
        registry.register("int4", 7);
        let settings = CodecSettings {
            max_dimensions: 2,
            ..Default::default()
        };
        let ctx = CodecContext::new(registry, CodecSettings::default()).with_settings(settings);
        assert_eq!(ctx.lookup.resolve("int4").unwrap(), 7);
        assert!(ctx.lookup.resolve("text").is_err());
        assert_eq!(ctx.settings.max_dimensions, 2);
        assert!(format!("{ctx:?}").contains("max_dimensions: 2"));
    }
}
