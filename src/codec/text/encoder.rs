//! Кодирование массива в текстовую форму.

use pgarray_error::{ArrayError, ArrayResult, ElementError};
use tracing::debug;

use super::is_array_space;
use crate::{
    array::{boundaries, closing_count, opening_count, Array, Dimension, Element, Status},
    context::CodecContext,
    scalar::ScalarCodec,
};

/// Дописывает текстовую форму массива в `buf`.
///
/// `Ok(false)` — NULL массив, в буфер ничего не записано. При ошибке буфер
/// обрезается до исходной длины.
pub fn encode<S: ScalarCodec>(
    _ctx: &CodecContext,
    array: &Array<S>,
    buf: &mut Vec<u8>,
) -> ArrayResult<bool> {
    match array.status {
        Status::Null => return Ok(false),
        Status::Undefined => {
            return Err(ArrayError::Undefined {
                what: format!("{}[]", S::TYPE_NAME),
            }
            .into())
        }
        Status::Present => {}
    }

    let start = buf.len();
    match encode_present(array, buf) {
        Ok(()) => {
            debug!(
                type_name = S::TYPE_NAME,
                ndims = array.dimensions.len(),
                elements = array.elements.len(),
                bytes = buf.len() - start,
                "encoded text array"
            );
            Ok(true)
        }
        Err(e) => {
            buf.truncate(start);
            Err(e)
        }
    }
}

fn encode_present<S: ScalarCodec>(
    array: &Array<S>,
    buf: &mut Vec<u8>,
) -> ArrayResult<()> {
    array.validate_shape()?;

    if array.elements.is_empty() {
        buf.extend_from_slice(b"{}");
        return Ok(());
    }

    if array.has_custom_bounds() {
        write_bounds(&array.dimensions, buf);
    }

    let bounds = boundaries(&array.dimensions);
    let mut scratch = Vec::new();

    for (i, elem) in array.elements.iter().enumerate() {
        if i > 0 {
            buf.push(b',');
        }
        for _ in 0..opening_count(&bounds, i) {
            buf.push(b'{');
        }

        match elem {
            Element::Null => buf.extend_from_slice(b"NULL"),
            _ => {
                scratch.clear();
                let has_bytes =
                    S::encode_text(elem, &mut scratch).map_err(|e| ArrayError::element(i, e))?;
                if !has_bytes {
                    return Err(ArrayError::element(
                        i,
                        ElementError::NoBytes {
                            type_name: S::TYPE_NAME,
                        },
                    )
                    .into());
                }
                quote_if_needed(&scratch, buf);
            }
        }

        for _ in 0..closing_count(&bounds, i) {
            buf.push(b'}');
        }
    }
    Ok(())
}

/// `[lo:hi]` для каждой оси и `=`.
fn write_bounds(
    dims: &[Dimension],
    buf: &mut Vec<u8>,
) {
    for d in dims {
        buf.extend_from_slice(format!("[{}:{}]", d.lower_bound, d.upper_bound()).as_bytes());
    }
    buf.push(b'=');
}

/// Нужно ли заключать текст элемента в кавычки.
pub fn needs_quoting(text: &[u8]) -> bool {
    text.is_empty()
        || text.eq_ignore_ascii_case(b"null")
        || text
            .iter()
            .any(|&b| matches!(b, b'{' | b'}' | b',' | b'"' | b'\\') || is_array_space(b))
}

/// Дописывает текст элемента, при необходимости в кавычках с экранированием
/// `"` и `\`.
pub fn quote_if_needed(
    text: &[u8],
    buf: &mut Vec<u8>,
) {
    if !needs_quoting(text) {
        buf.extend_from_slice(text);
        return;
    }
    buf.reserve(text.len() + 2);
    buf.push(b'"');
    for &b in text {
        if b == b'"' || b == b'\\' {
            buf.push(b'\\');
        }
        buf.push(b);
    }
    buf.push(b'"');
}
