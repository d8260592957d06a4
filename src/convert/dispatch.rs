//! Хост-значение -> канонический массив.

use pgarray_error::{ArrayError, ArrayResult, ElementError};
use tracing::trace;

use super::host::HostValue;
use crate::{
    array::{Array, Element, Status},
    context::CodecContext,
    scalar::ScalarCodec,
};

impl<S: ScalarCodec> Array<S> {
    /// Строит массив из хост-значения.
    ///
    /// Порядок: nil, разворачивание обёрток (с ограничением глубины), прямые
    /// формы, затем структурный fallback через [`AsSequence`](super::AsSequence).
    pub fn from_host(
        ctx: &CodecContext,
        host: HostValue<S>,
    ) -> ArrayResult<Self> {
        from_host_at(ctx, host, 0)
    }
}

fn from_host_at<S: ScalarCodec>(
    ctx: &CodecContext,
    host: HostValue<S>,
    depth: usize,
) -> ArrayResult<Array<S>> {
    match host {
        HostValue::Wrapped(wrapper) => {
            let host_type = wrapper.type_name();
            let Some(inner) = wrapper.inner() else {
                return Err(unconvertible::<S>(host_type));
            };
            if depth >= ctx.settings.max_unwrap_depth {
                return Err(ArrayError::UnwrapDepth {
                    limit: ctx.settings.max_unwrap_depth,
                    host_type,
                }
                .into());
            }
            trace!(host_type = %host_type, depth, "unwrapping host value");
            from_host_at(ctx, inner, depth + 1)
        }
        HostValue::Sequence(seq) => {
            let host_type = seq.type_name();
            match seq.underlying() {
                Some(direct) if direct.is_direct() => {
                    trace!(host_type = %host_type, "retrying as underlying sequence");
                    from_direct(ctx, direct)
                }
                _ => Err(unconvertible::<S>(host_type)),
            }
        }
        direct => from_direct(ctx, direct),
    }
}

fn from_direct<S: ScalarCodec>(
    ctx: &CodecContext,
    host: HostValue<S>,
) -> ArrayResult<Array<S>> {
    match host {
        HostValue::Nil | HostValue::Natives(None) | HostValue::Elements(None) => Ok(Array::null()),
        HostValue::Natives(Some(values)) => {
            check_len::<S>(ctx, values.len())?;
            let mut elements = Vec::with_capacity(values.len());
            for (i, v) in values.iter().enumerate() {
                let elem = S::convert_from_host(Some(v)).map_err(|e| ArrayError::element(i, e))?;
                elements.push(elem);
            }
            Array::try_from_elements(elements)
        }
        HostValue::Elements(Some(elements)) => {
            check_len::<S>(ctx, elements.len())?;
            if let Some(i) = elements.iter().position(|e| matches!(e, Element::Undefined)) {
                return Err(ArrayError::element(
                    i,
                    ElementError::Undefined {
                        type_name: S::TYPE_NAME,
                    },
                )
                .into());
            }
            Array::try_from_elements(elements)
        }
        HostValue::Array(array) => {
            if array.status == Status::Undefined {
                return Err(ArrayError::Undefined {
                    what: format!("{}[]", S::TYPE_NAME),
                }
                .into());
            }
            array.validate_shape()?;
            Ok(array)
        }
        other => Err(unconvertible::<S>(other.type_name())),
    }
}

fn check_len<S: ScalarCodec>(
    ctx: &CodecContext,
    len: usize,
) -> ArrayResult<()> {
    if len > ctx.settings.max_elements || len > u32::MAX as usize {
        return Err(ArrayError::SizeLimit {
            what: format!("{}[] element count", S::TYPE_NAME),
            size: len,
            limit: ctx.settings.max_elements,
        }
        .into());
    }
    Ok(())
}

fn unconvertible<S: ScalarCodec>(host_type: String) -> pgarray_error::StackError {
    ArrayError::Unconvertible {
        host_type,
        array_type: format!("{}[]", S::TYPE_NAME),
    }
    .into()
}
