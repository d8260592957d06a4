//! Связка с драйвером источника данных: значение колонки на входе
//! (`scan`) и параметр запроса на выходе (`value`).

use pgarray_error::{ArrayError, ArrayResult, ResultExt};

use crate::{array::Array, context::CodecContext, scalar::ScalarCodec};

/// Значение, которым обменивается драйвер.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireValue {
    Text(String),
    Bytes(Vec<u8>),
    /// SQL NULL.
    Absent,
}

impl<S: ScalarCodec> Array<S> {
    /// Разбирает значение драйвера. Строка и байты считаются текстовой
    /// формой.
    pub fn scan(
        ctx: &CodecContext,
        src: WireValue,
    ) -> ArrayResult<Self> {
        let decoded = match src {
            WireValue::Text(s) => Self::decode_text(ctx, Some(s.as_bytes())),
            WireValue::Bytes(b) => Self::decode_text(ctx, Some(&b)),
            WireValue::Absent => return Ok(Self::null()),
        };
        decoded.with_context(|| format!("scanning {}[] column", S::TYPE_NAME))
    }

    /// Текстовая форма для передачи драйверу. NULL массив даёт `Absent`.
    pub fn value(
        &self,
        ctx: &CodecContext,
    ) -> ArrayResult<WireValue> {
        let mut buf = Vec::new();
        if !self.encode_text(ctx, &mut buf)? {
            return Ok(WireValue::Absent);
        }
        String::from_utf8(buf).map(WireValue::Text).map_err(|e| {
            ArrayError::Element {
                index: None,
                source: pgarray_error::ElementError::malformed(S::TYPE_NAME, e.to_string()),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use pgarray_error::StatusCode;

    use super::*;
    use crate::{array::Element, scalar::Text};

    #[test]
    fn test_scan_text_and_bytes() {
        let ctx = CodecContext::default();
        let from_text = Array::<Text>::scan(&ctx, WireValue::Text("{a,NULL}".into())).unwrap();
        let from_bytes = Array::<Text>::scan(&ctx, WireValue::Bytes(b"{a,NULL}".to_vec())).unwrap();
        assert_eq!(from_text, from_bytes);
        assert_eq!(
            from_text.elements,
            vec![Element::Present("a".to_string()), Element::Null]
        );
    }

    #[test]
    fn test_scan_absent_is_null() {
        let a = Array::<Text>::scan(&CodecContext::default(), WireValue::Absent).unwrap();
        assert!(a.is_null());
    }

    /// Тест проверяет, что ошибка разбора колонки несёт контекст, а исходная
    /// ошибка доступна через downcast.
    #[test]
    fn test_scan_error_has_context() {
        let ctx = CodecContext::default();
        let err = Array::<Text>::scan(&ctx, WireValue::Text("{a".into())).unwrap_err();
        assert_eq!(err.contexts()[0].message, "scanning text[] column");
        assert_eq!(err.status_code(), StatusCode::ParseError);
        assert!(err.downcast_ref::<ArrayError>().is_some());
        assert!(err.to_string().starts_with("scanning text[] column: "));
    }

    #[test]
    fn test_value() {
        let ctx = CodecContext::default();
        let a = Array::<Text>::from_values(["x y".to_string()]);
        assert_eq!(a.value(&ctx).unwrap(), WireValue::Text(r#"{"x y"}"#.into()));
        assert_eq!(Array::<Text>::null().value(&ctx).unwrap(), WireValue::Absent);
        assert_eq!(
            Array::<Text>::default().value(&ctx).unwrap_err().status_code(),
            StatusCode::UndefinedValue
        );
    }
}
