//! Реестр идентификаторов типов: имя типа элемента -> wire type id.
//!
//! Используется только бинарным кодировщиком для заголовка массива.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use pgarray_error::{ArrayError, ArrayResult};
use tracing::debug;

/// Источник идентификаторов типов.
pub trait TypeLookup: Send + Sync {
    /// Возвращает идентификатор для имени типа или `UnresolvedType`.
    fn resolve(
        &self,
        type_name: &str,
    ) -> ArrayResult<u32>;
}

/// Встроенные типы источника данных и их идентификаторы.
const BUILTIN_TYPES: &[(&str, u32)] = &[
    ("bool", 16),
    ("bytea", 17),
    ("int8", 20),
    ("int2", 21),
    ("int4", 23),
    ("text", 25),
    ("oid", 26),
    ("float4", 700),
    ("float8", 701),
    ("macaddr", 829),
    ("inet", 869),
    ("aclitem", 1033),
    ("varchar", 1043),
    ("date", 1082),
    ("timestamp", 1114),
    ("timestamptz", 1184),
    ("numeric", 1700),
    ("uuid", 2950),
];

static DEFAULT_REGISTRY: Lazy<Arc<TypeRegistry>> =
    Lazy::new(|| Arc::new(TypeRegistry::with_defaults()));

/// Потокобезопасный реестр типов на `DashMap`.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: DashMap<String, u32>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Реестр со встроенными типами.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        for (name, oid) in BUILTIN_TYPES {
            registry.register(*name, *oid);
        }
        registry
    }

    /// Регистрирует (или перезаписывает) тип. Возвращает прежний id.
    pub fn register(
        &self,
        name: impl Into<String>,
        oid: u32,
    ) -> Option<u32> {
        let name = name.into();
        debug!(type_name = %name, oid, "registering type");
        self.types.insert(name, oid)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeLookup for TypeRegistry {
    fn resolve(
        &self,
        type_name: &str,
    ) -> ArrayResult<u32> {
        self.types
            .get(type_name)
            .map(|entry| *entry.value())
            .ok_or_else(|| {
                ArrayError::UnresolvedType {
                    type_name: type_name.to_string(),
                }
                .into()
            })
    }
}

/// Общий для процесса реестр со встроенными типами.
pub fn default_registry() -> Arc<TypeRegistry> {
    Arc::clone(&DEFAULT_REGISTRY)
}
