//! Скалярные кодеки: преобразование одного элемента массива между текстовым
//! и бинарным wire-представлением и хост-типом.
//!
//! Движок массивов обобщён по [`ScalarCodec`] и ничего не знает о
//! конкретных типах элементов. Реализация задаёт только примитивы
//! `*_value`, обработка NULL и Undefined предоставляется трейтом.

pub mod aclitem;
pub mod date;
pub mod int4;
pub mod macaddr;
pub mod text;

use std::fmt;

pub use aclitem::AclItem;
pub use date::{Date, DateValue};
pub use int4::Int4;
pub use macaddr::Macaddr;
pub use text::Text;

use pgarray_error::{ElementError, ElementResult};

use crate::array::Element;

/// Кодек одного скалярного типа элемента.
///
/// Реализуется маркер-типом без данных: все методы статические.
pub trait ScalarCodec:
    fmt::Debug + Clone + Copy + PartialEq + Eq + Default + Send + Sync + 'static
{
    /// Каноническое представление значения элемента.
    type Value: fmt::Debug + Clone + PartialEq + Send + Sync + 'static;

    /// Естественный хост-тип, в который и из которого конвертируются элементы.
    type Native: fmt::Debug + Clone + PartialEq + Send + Sync + 'static;

    /// Имя типа во внешнем источнике данных (ключ реестра типов).
    const TYPE_NAME: &'static str;

    fn decode_text_value(src: &[u8]) -> ElementResult<Self::Value>;

    fn encode_text_value(
        value: &Self::Value,
        buf: &mut Vec<u8>,
    ) -> ElementResult<()>;

    fn decode_binary_value(_src: &[u8]) -> ElementResult<Self::Value> {
        Err(ElementError::Unsupported {
            type_name: Self::TYPE_NAME,
            operation: "binary decoding",
        })
    }

    fn encode_binary_value(
        _value: &Self::Value,
        _buf: &mut Vec<u8>,
    ) -> ElementResult<()> {
        Err(ElementError::Unsupported {
            type_name: Self::TYPE_NAME,
            operation: "binary encoding",
        })
    }

    fn from_native(native: &Self::Native) -> ElementResult<Self::Value>;

    fn to_native(value: &Self::Value) -> ElementResult<Self::Native>;

    ////////////////////////////////////////////////////////////////////////////
    // Обёртки с обработкой NULL
    ////////////////////////////////////////////////////////////////////////////

    /// `None` — NULL элемент.
    fn decode_text(src: Option<&[u8]>) -> ElementResult<Element<Self::Value>> {
        match src {
            Some(bytes) => Self::decode_text_value(bytes).map(Element::Present),
            None => Ok(Element::Null),
        }
    }

    /// Дописывает текст элемента в `buf`. `false` — байтов нет (NULL).
    fn encode_text(
        elem: &Element<Self::Value>,
        buf: &mut Vec<u8>,
    ) -> ElementResult<bool> {
        match elem {
            Element::Present(v) => {
                Self::encode_text_value(v, buf)?;
                Ok(true)
            }
            Element::Null => Ok(false),
            Element::Undefined => Err(ElementError::Undefined {
                type_name: Self::TYPE_NAME,
            }),
        }
    }

    fn decode_binary(src: Option<&[u8]>) -> ElementResult<Element<Self::Value>> {
        match src {
            Some(bytes) => Self::decode_binary_value(bytes).map(Element::Present),
            None => Ok(Element::Null),
        }
    }

    fn encode_binary(
        elem: &Element<Self::Value>,
        buf: &mut Vec<u8>,
    ) -> ElementResult<bool> {
        match elem {
            Element::Present(v) => {
                Self::encode_binary_value(v, buf)?;
                Ok(true)
            }
            Element::Null => Ok(false),
            Element::Undefined => Err(ElementError::Undefined {
                type_name: Self::TYPE_NAME,
            }),
        }
    }

    /// `None` — nil хост-значение, даёт NULL элемент.
    fn convert_from_host(native: Option<&Self::Native>) -> ElementResult<Element<Self::Value>> {
        match native {
            Some(n) => Self::from_native(n).map(Element::Present),
            None => Ok(Element::Null),
        }
    }

    /// NULL нельзя записать в не-nullable хост-тип.
    fn convert_to_host(elem: &Element<Self::Value>) -> ElementResult<Self::Native> {
        match elem {
            Element::Present(v) => Self::to_native(v),
            Element::Null => Err(ElementError::NullNotAllowed {
                type_name: Self::TYPE_NAME,
            }),
            Element::Undefined => Err(ElementError::Undefined {
                type_name: Self::TYPE_NAME,
            }),
        }
    }
}

/// Проверяет, что буфер бинарного значения имеет ровно `expected` байт.
pub(crate) fn expect_len(
    type_name: &'static str,
    src: &[u8],
    expected: usize,
) -> ElementResult<()> {
    if src.len() != expected {
        return Err(ElementError::malformed(
            type_name,
            format!("invalid length: expected {expected} bytes, got {}", src.len()),
        ));
    }
    Ok(())
}

/// Текстовое значение элемента как UTF-8.
pub(crate) fn as_utf8<'a>(
    type_name: &'static str,
    src: &'a [u8],
) -> ElementResult<&'a str> {
    std::str::from_utf8(src).map_err(|e| ElementError::malformed(type_name, e.to_string()))
}
