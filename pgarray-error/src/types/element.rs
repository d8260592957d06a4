use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибка скалярного кодека одного элемента массива.
///
/// Некорректный ненулевой ввод (`Malformed`) и неподходящее хост-значение
/// (`Unconvertible`) различаются.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementError {
    #[error("invalid input for {type_name}: {reason}")]
    Malformed {
        type_name: &'static str,
        reason: String,
    },

    #[error("cannot convert {host} to {type_name}")]
    Unconvertible {
        type_name: &'static str,
        host: String,
    },

    #[error("cannot assign NULL {type_name} to a non-nullable host value")]
    NullNotAllowed { type_name: &'static str },

    #[error("undefined {type_name} value")]
    Undefined { type_name: &'static str },

    #[error("{type_name} does not support {operation}")]
    Unsupported {
        type_name: &'static str,
        operation: &'static str,
    },

    #[error("{type_name} element encoded to no bytes")]
    NoBytes { type_name: &'static str },
}

impl ElementError {
    pub fn malformed(
        type_name: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::Malformed {
            type_name,
            reason: reason.into(),
        }
    }

    pub fn unconvertible(
        type_name: &'static str,
        host: impl Into<String>,
    ) -> Self {
        Self::Unconvertible {
            type_name,
            host: host.into(),
        }
    }

    /// Имя скалярного типа, в котором произошла ошибка.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Malformed { type_name, .. }
            | Self::Unconvertible { type_name, .. }
            | Self::NullNotAllowed { type_name }
            | Self::Undefined { type_name }
            | Self::Unsupported { type_name, .. }
            | Self::NoBytes { type_name } => type_name,
        }
    }
}

impl ErrorExt for ElementError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Malformed { .. } => StatusCode::InvalidValue,
            Self::Unconvertible { .. } => StatusCode::ConversionFailed,
            Self::NullNotAllowed { .. } => StatusCode::NullViolation,
            Self::Undefined { .. } => StatusCode::UndefinedValue,
            Self::Unsupported { .. } => StatusCode::Unsupported,
            Self::NoBytes { .. } => StatusCode::EncodingError,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_and_unconvertible_are_distinct() {
        let m = ElementError::malformed("macaddr", "bad octet");
        let u = ElementError::unconvertible("macaddr", "8-byte hardware address");

        assert_ne!(m.status_code(), u.status_code());
        assert_eq!(m.to_string(), "invalid input for macaddr: bad octet");
        assert_eq!(
            u.to_string(),
            "cannot convert 8-byte hardware address to macaddr"
        );
    }

    #[test]
    fn test_type_name() {
        let e = ElementError::NullNotAllowed { type_name: "date" };
        assert_eq!(e.type_name(), "date");
        assert_eq!(e.status_code(), StatusCode::NullViolation);
    }
}
