use byteorder::{BigEndian, ByteOrder};
use pgarray_error::{ArrayError, ArrayResult, ElementError};
use tracing::debug;

use super::{decoder::NULL_LENGTH, header::ArrayHeader};
use crate::{
    array::{Array, Element, Status},
    context::CodecContext,
    scalar::ScalarCodec,
};

/// Дописывает бинарную форму массива в `buf`.
///
/// `Ok(false)` — NULL массив, ничего не записано. Идентификатор типа
/// элемента берётся из реестра контекста. При ошибке буфер обрезается до
/// исходной длины.
pub fn encode<S: ScalarCodec>(
    ctx: &CodecContext,
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
    match encode_present(ctx, array, buf) {
        Ok(()) => {
            debug!(
                type_name = S::TYPE_NAME,
                ndims = array.dimensions.len(),
                elements = array.elements.len(),
                bytes = buf.len() - start,
                "encoded binary array"
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
    ctx: &CodecContext,
    array: &Array<S>,
    buf: &mut Vec<u8>,
) -> ArrayResult<()> {
    array.validate_shape()?;

    let element_type_id = ctx.lookup.resolve(S::TYPE_NAME)?;
    let header = ArrayHeader {
        contains_null: array.contains_null(),
        element_type_id,
        dimensions: array.dimensions.clone(),
    };
    header.encode(buf)?;

    for (i, elem) in array.elements.iter().enumerate() {
        if let Element::Null = elem {
            buf.extend_from_slice(&NULL_LENGTH.to_be_bytes());
            continue;
        }

        let len_pos = buf.len();
        buf.extend_from_slice(&[0; 4]);
        let has_bytes = S::encode_binary(elem, buf).map_err(|e| ArrayError::element(i, e))?;
        if !has_bytes {
            return Err(ArrayError::element(
                i,
                ElementError::NoBytes {
                    type_name: S::TYPE_NAME,
                },
            )
            .into());
        }

        let written = buf.len() - len_pos - 4;
        let len = i32::try_from(written).map_err(|_| ArrayError::SizeLimit {
            what: format!("element {i} length"),
            size: written,
            limit: i32::MAX as usize,
        })?;
        BigEndian::write_i32(&mut buf[len_pos..len_pos + 4], len);
    }
    Ok(())
}
