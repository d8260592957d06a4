use std::{any::Any, fmt};

use crate::{ElementError, ErrorExt, StatusCode};

/// Wire-представление, в котором произошла ошибка разбора.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    Text,
    Binary,
}

/// Ошибка движка массивов: разбор, кодирование и конвертация.
#[derive(Debug, Clone)]
pub enum ArrayError {
    /// Нарушение грамматики текста, несовпадение длин соседних групп,
    /// обрезанный бинарный буфер, недопустимая длина элемента.
    Malformed {
        format: WireFormat,
        reason: String,
        position: Option<usize>,
    },

    /// Имя типа элемента не зарегистрировано в реестре типов.
    UnresolvedType { type_name: String },

    /// Хост-значение не подходит ни под одну поддерживаемую форму.
    Unconvertible {
        host_type: String,
        array_type: String,
    },

    /// Массив нельзя записать в целевое хост-значение.
    Unassignable {
        target_type: String,
        array_type: String,
    },

    /// NULL-массив нельзя записать в не-nullable цель.
    NullNotAssignable { target_type: String },

    /// Ошибка скалярного кодека с позицией элемента (индекс в плоском
    /// порядке).
    Element {
        index: Option<usize>,
        source: ElementError,
    },

    /// Значение в состоянии Undefined дошло до кодирования или конвертации.
    Undefined { what: String },

    /// Размерности описывают другое кол-во элементов, чем хранится.
    ShapeMismatch { expected: usize, got: usize },

    /// Превышен лимит (размерности, кол-во элементов, длина).
    SizeLimit {
        what: String,
        size: usize,
        limit: usize,
    },

    /// Превышена глубина разворачивания обёрток или альтернативных целей.
    UnwrapDepth { limit: usize, host_type: String },
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl ArrayError {
    pub fn malformed(
        format: WireFormat,
        reason: impl Into<String>,
    ) -> Self {
        Self::Malformed {
            format,
            reason: reason.into(),
            position: None,
        }
    }

    /// Ошибка элемента с индексом в плоском порядке.
    pub fn element(
        index: usize,
        source: ElementError,
    ) -> Self {
        Self::Element {
            index: Some(index),
            source,
        }
    }

    /// Добавляет позицию во входе (байтовое смещение) к ошибке разбора.
    pub fn with_position(
        mut self,
        pos: usize,
    ) -> Self {
        if let Self::Malformed { position, .. } = &mut self {
            *position = Some(pos);
        }
        self
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }

    /// Ошибка скалярного кодека, если она есть.
    pub fn element_error(&self) -> Option<&ElementError> {
        match self {
            Self::Element { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

impl fmt::Display for ArrayError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Malformed {
                format,
                reason,
                position,
            } => {
                write!(f, "malformed {format} array: {reason}")?;
                if let Some(p) = position {
                    write!(f, " [position: {p}]")?;
                }
                Ok(())
            }
            Self::UnresolvedType { type_name } => {
                write!(f, "unable to find type identifier for type name {type_name}")
            }
            Self::Unconvertible {
                host_type,
                array_type,
            } => write!(f, "cannot convert {host_type} to {array_type}"),
            Self::Unassignable {
                target_type,
                array_type,
            } => write!(f, "unable to assign {array_type} to {target_type}"),
            Self::NullNotAssignable { target_type } => {
                write!(f, "cannot assign NULL to {target_type}")
            }
            Self::Element { index, source } => match index {
                Some(i) => write!(f, "element {i}: {source}"),
                None => write!(f, "element: {source}"),
            },
            Self::Undefined { what } => write!(f, "cannot process undefined {what}"),
            Self::ShapeMismatch { expected, got } => write!(
                f,
                "dimensions describe {expected} elements, array holds {got}"
            ),
            Self::SizeLimit { what, size, limit } => {
                write!(f, "{what} {size} exceeds limit {limit}")
            }
            Self::UnwrapDepth { limit, host_type } => write!(
                f,
                "unwrap depth limit {limit} exceeded while processing {host_type}"
            ),
        }
    }
}

impl std::error::Error for ArrayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Element { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl ErrorExt for ArrayError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Malformed {
                format: WireFormat::Text,
                ..
            } => StatusCode::ParseError,
            Self::Malformed {
                format: WireFormat::Binary,
                ..
            } => StatusCode::DecodingError,
            Self::UnresolvedType { .. } => StatusCode::UnresolvedType,
            Self::Unconvertible { .. } => StatusCode::ConversionFailed,
            Self::Unassignable { .. } => StatusCode::AssignmentFailed,
            Self::NullNotAssignable { .. } => StatusCode::NullViolation,
            Self::Element { source, .. } => source.status_code(),
            Self::Undefined { .. } => StatusCode::UndefinedValue,
            Self::ShapeMismatch { .. } => StatusCode::ShapeMismatch,
            Self::SizeLimit { .. } => StatusCode::SizeLimit,
            Self::UnwrapDepth { .. } => StatusCode::DepthLimit,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
