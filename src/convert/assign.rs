//! Канонический массив -> хост-значение.

use pgarray_error::{ArrayError, ArrayResult, ElementError};
use tracing::trace;

use super::host::HostTarget;
use crate::{
    array::{Array, Element, Status},
    context::CodecContext,
    scalar::ScalarCodec,
};

impl<S: ScalarCodec> Array<S> {
    /// Записывает массив в хост-цель.
    ///
    /// При ошибке содержимое цели не определено.
    pub fn assign_to(
        &self,
        ctx: &CodecContext,
        target: HostTarget<'_, S>,
    ) -> ArrayResult<()> {
        if self.status == Status::Undefined {
            return Err(ArrayError::Undefined {
                what: format!("{}[]", S::TYPE_NAME),
            }
            .into());
        }
        self.validate_shape()?;
        assign_at(self, ctx, target, 0)
    }

    /// Элементы в естественном хост-типе. NULL массив даёт `None`.
    pub fn to_natives(
        &self,
        ctx: &CodecContext,
    ) -> ArrayResult<Option<Vec<S::Native>>> {
        let mut out = None;
        self.assign_to(ctx, HostTarget::Natives(&mut out))?;
        Ok(out)
    }
}

fn assign_at<S: ScalarCodec>(
    array: &Array<S>,
    ctx: &CodecContext,
    target: HostTarget<'_, S>,
    depth: usize,
) -> ArrayResult<()> {
    let is_null = array.status == Status::Null;

    match target {
        HostTarget::Natives(slot) => {
            if is_null {
                *slot = None;
                return Ok(());
            }
            let mut out = Vec::with_capacity(array.elements.len());
            for (i, elem) in array.elements.iter().enumerate() {
                out.push(S::convert_to_host(elem).map_err(|e| ArrayError::element(i, e))?);
            }
            *slot = Some(out);
            Ok(())
        }
        HostTarget::OptionalNatives(slot) => {
            if is_null {
                *slot = None;
                return Ok(());
            }
            let mut out = Vec::with_capacity(array.elements.len());
            for (i, elem) in array.elements.iter().enumerate() {
                let value = match elem {
                    Element::Null => None,
                    Element::Present(_) => {
                        Some(S::convert_to_host(elem).map_err(|e| ArrayError::element(i, e))?)
                    }
                    Element::Undefined => {
                        return Err(ArrayError::element(
                            i,
                            ElementError::Undefined {
                                type_name: S::TYPE_NAME,
                            },
                        )
                        .into());
                    }
                };
                out.push(value);
            }
            *slot = Some(out);
            Ok(())
        }
        HostTarget::Custom(custom) => {
            let target_type = custom.type_name();
            let Some(alternate) = custom.alternate() else {
                return Err(if is_null {
                    ArrayError::NullNotAssignable { target_type }
                } else {
                    ArrayError::Unassignable {
                        target_type,
                        array_type: format!("{}[]", S::TYPE_NAME),
                    }
                }
                .into());
            };
            if depth >= ctx.settings.max_unwrap_depth {
                return Err(ArrayError::UnwrapDepth {
                    limit: ctx.settings.max_unwrap_depth,
                    host_type: target_type,
                }
                .into());
            }
            trace!(target_type = %target_type, depth, "retrying with alternate target");
            assign_at(array, ctx, alternate, depth + 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use pgarray_error::StatusCode;

    use super::*;
    use crate::{
        convert::AssignTarget,
        scalar::{Date, DateValue, Int4},
    };

    fn ctx() -> CodecContext {
        CodecContext::default()
    }

    #[test]
    fn test_assign_natives() {
        let a = Array::<Int4>::from_values([1, 2, 3]);
        let mut out = None;
        a.assign_to(&ctx(), HostTarget::Natives(&mut out)).unwrap();
        assert_eq!(out, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_null_array_clears_target() {
        let mut out = Some(vec![9]);
        Array::<Int4>::null()
            .assign_to(&ctx(), HostTarget::Natives(&mut out))
            .unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn test_null_element_needs_optional_target() {
        let a = Array::<Int4>::from_elements(vec![Element::Present(1), Element::Null]);

        let mut strict = None;
        let err = a.assign_to(&ctx(), HostTarget::Natives(&mut strict)).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NullViolation);

        let mut optional = None;
        a.assign_to(&ctx(), HostTarget::OptionalNatives(&mut optional))
            .unwrap();
        assert_eq!(optional, Some(vec![Some(1), None]));
    }

    #[test]
    fn test_infinite_date_unconvertible() {
        let a = Array::<Date>::from_values([DateValue::Infinity]);
        let err = a.to_natives(&ctx()).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::ConversionFailed);
    }

    #[test]
    fn test_undefined_array() {
        let mut out = None;
        let err = Array::<Int4>::default()
            .assign_to(&ctx(), HostTarget::Natives(&mut out))
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UndefinedValue);
    }

    /// Цель, которая хранит значения в своём поле.
    #[derive(Default)]
    struct Holder {
        values: Option<Vec<i32>>,
    }

    impl AssignTarget<Int4> for Holder {
        fn alternate(&mut self) -> Option<HostTarget<'_, Int4>> {
            Some(HostTarget::Natives(&mut self.values))
        }
    }

    /// Цель без альтернатив.
    struct Opaque;

    impl AssignTarget<Int4> for Opaque {
        fn alternate(&mut self) -> Option<HostTarget<'_, Int4>> {
            None
        }

        fn type_name(&self) -> String {
            "Opaque".to_string()
        }
    }

    #[test]
    fn test_custom_alternate() {
        let mut holder = Holder::default();
        Array::<Int4>::from_values([4])
            .assign_to(&ctx(), HostTarget::Custom(&mut holder))
            .unwrap();
        assert_eq!(holder.values, Some(vec![4]));
    }

    #[test]
    fn test_custom_without_alternate() {
        let err = Array::<Int4>::from_values([4])
            .assign_to(&ctx(), HostTarget::Custom(&mut Opaque))
            .unwrap_err();
        assert_eq!(err.to_string(), "unable to assign int4[] to Opaque");

        let err = Array::<Int4>::null()
            .assign_to(&ctx(), HostTarget::Custom(&mut Opaque))
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NullViolation);
    }

    /// Цель, которая бесконечно предлагает саму себя.
    struct Mirror;

    impl AssignTarget<Int4> for Mirror {
        fn alternate(&mut self) -> Option<HostTarget<'_, Int4>> {
            Some(HostTarget::Custom(self))
        }
    }

    #[test]
    fn test_alternate_depth_bounded() {
        let err = Array::<Int4>::from_values([1])
            .assign_to(&ctx(), HostTarget::Custom(&mut Mirror))
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::DepthLimit);
    }
}
