use byteorder::{BigEndian, ByteOrder};
use pgarray_error::{ElementError, ElementResult};

use super::{as_utf8, expect_len, ScalarCodec};

/// 32-битное знаковое целое: десятичный текст, 4 байта big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Int4;

impl ScalarCodec for Int4 {
    type Value = i32;
    type Native = i32;

    const TYPE_NAME: &'static str = "int4";

    fn decode_text_value(src: &[u8]) -> ElementResult<i32> {
        let s = as_utf8(Self::TYPE_NAME, src)?;
        s.trim()
            .parse::<i32>()
            .map_err(|e| ElementError::malformed(Self::TYPE_NAME, format!("{s:?}: {e}")))
    }

    fn encode_text_value(
        value: &i32,
        buf: &mut Vec<u8>,
    ) -> ElementResult<()> {
        buf.extend_from_slice(value.to_string().as_bytes());
        Ok(())
    }

    fn decode_binary_value(src: &[u8]) -> ElementResult<i32> {
        expect_len(Self::TYPE_NAME, src, 4)?;
        Ok(BigEndian::read_i32(src))
    }

    fn encode_binary_value(
        value: &i32,
        buf: &mut Vec<u8>,
    ) -> ElementResult<()> {
        let mut raw = [0u8; 4];
        BigEndian::write_i32(&mut raw, *value);
        buf.extend_from_slice(&raw);
        Ok(())
    }

    fn from_native(native: &i32) -> ElementResult<i32> {
        Ok(*native)
    }

    fn to_native(value: &i32) -> ElementResult<i32> {
        Ok(*value)
    }
}
