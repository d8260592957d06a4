use pgarray_error::ElementResult;

use super::{as_utf8, ScalarCodec};

/// Элемент списка прав доступа (`grantee=privs/grantor`).
///
/// Хранится как текст без проверки содержимого: любая строка, включая
/// пустую, принимается как есть. Источник данных не определяет бинарной формы, так
/// что бинарные методы остаются по умолчанию (`Unsupported`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AclItem;

impl ScalarCodec for AclItem {
    type Value = String;
    type Native = String;

    const TYPE_NAME: &'static str = "aclitem";

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

    fn from_native(native: &String) -> ElementResult<String> {
        Ok(native.clone())
    }

    fn to_native(value: &String) -> ElementResult<String> {
        Ok(value.clone())
    }
}
