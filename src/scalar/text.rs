use pgarray_error::ElementResult;

use super::{as_utf8, ScalarCodec};

/// Строка переменной длины. Бинарная форма совпадает с текстовой: сырые
/// байты UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Text;

impl ScalarCodec for Text {
    type Value = String;
    type Native = String;

    const TYPE_NAME: &'static str = "text";

    fn decode_text_value(src: &[u8]) -> ElementResult<String> {
        as_utf8(Self::TYPE_NAME, src).map(str::to_owned)
    }

    fn encode_text_value(
        value: &String,
        buf: &mut Vec<u8>,
    ) -> ElementResult<()> {
        buf.extend_from_slice(value.as_bytes());
        Ok(())
    }

    fn decode_binary_value(src: &[u8]) -> ElementResult<String> {
        Self::decode_text_value(src)
    }

    fn encode_binary_value(
        value: &String,
        buf: &mut Vec<u8>,
    ) -> ElementResult<()> {
        Self::encode_text_value(value, buf)
    }

    fn from_native(native: &String) -> ElementResult<String> {
        Ok(native.clone())
    }

    fn to_native(value: &String) -> ElementResult<String> {
        Ok(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use pgarray_error::ElementError;

    use super::*;

    #[test]
    fn test_empty_string_is_value() {
        assert_eq!(Text::decode_text_value(b"").unwrap(), "");
        let mut buf = Vec::new();
        Text::encode_binary_value(&String::new(), &mut buf).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_invalid_utf8() {
        let bytes = vec![b'a', 0xff];
        assert!(matches!(
            Text::decode_binary_value(&bytes),
            Err(ElementError::Malformed { type_name: "text", .. })
        ));
    }
}
