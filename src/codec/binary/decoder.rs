use byteorder::{BigEndian, ByteOrder};
use pgarray_error::{ArrayError, ArrayResult, WireFormat};
use tracing::{debug, warn};

use super::header::ArrayHeader;
use crate::{
    array::{element_count, Array, Status},
    context::CodecContext,
    scalar::ScalarCodec,
};

/// Длина элемента, обозначающая NULL.
pub const NULL_LENGTH: i32 = -1;

/// Декодирует бинарную форму. `None` на входе — NULL массив.
///
/// Лишние байты после последнего элемента допускаются и логируются.
pub fn decode<S: ScalarCodec>(
    ctx: &CodecContext,
    src: Option<&[u8]>,
) -> ArrayResult<Array<S>> {
    let Some(src) = src else {
        return Ok(Array::null());
    };

    let (header, mut pos) = ArrayHeader::decode(src, &ctx.settings)?;

    if header.dimensions.is_empty() {
        warn_trailing(src, pos);
        return Ok(Array::empty());
    }

    let count = element_count(&header.dimensions)
        .filter(|&n| n <= ctx.settings.max_elements)
        .ok_or_else(|| {
            ArrayError::malformed(
                WireFormat::Binary,
                format!(
                    "array size exceeds the maximum allowed ({})",
                    ctx.settings.max_elements
                ),
            )
        })?;

    // Не доверяем заголовку при резервировании: каждый элемент занимает
    // минимум 4 байта.
    let mut elements = Vec::with_capacity(count.min((src.len() - pos) / 4));
    for i in 0..count {
        let Some(len_bytes) = src.get(pos..pos + 4) else {
            return Err(ArrayError::malformed(
                WireFormat::Binary,
                format!("element {i} length truncated"),
            )
            .with_position(pos)
            .into());
        };
        let len = BigEndian::read_i32(len_bytes);
        pos += 4;

        let payload = match len {
            NULL_LENGTH => None,
            l if l < NULL_LENGTH => {
                return Err(ArrayError::malformed(
                    WireFormat::Binary,
                    format!("invalid length {l} for element {i}"),
                )
                .with_position(pos - 4)
                .into());
            }
            l => {
                let end = pos + l as usize;
                let Some(bytes) = src.get(pos..end) else {
                    return Err(ArrayError::malformed(
                        WireFormat::Binary,
                        format!(
                            "element {i} truncated: need {l} bytes, {} available",
                            src.len() - pos
                        ),
                    )
                    .with_position(pos)
                    .into());
                };
                pos = end;
                Some(bytes)
            }
        };

        let elem = S::decode_binary(payload).map_err(|e| ArrayError::element(i, e))?;
        elements.push(elem);
    }

    warn_trailing(src, pos);
    debug!(
        type_name = S::TYPE_NAME,
        ndims = header.dimensions.len(),
        elements = elements.len(),
        bytes = pos,
        "decoded binary array"
    );

    Ok(Array {
        elements,
        dimensions: header.dimensions,
        status: Status::Present,
    })
}

fn warn_trailing(
    src: &[u8],
    pos: usize,
) {
    if pos < src.len() {
        warn!(
            trailing = src.len() - pos,
            "ignoring trailing bytes after binary array"
        );
    }
}
