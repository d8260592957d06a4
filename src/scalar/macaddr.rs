use pgarray_error::{ElementError, ElementResult};

use super::{as_utf8, expect_len, ScalarCodec};

const MAC_LEN: usize = 6;

/// 6-байтный аппаратный адрес.
///
/// Текст: шесть пар hex-цифр через `:` или `-`, на выходе всегда
/// строчные через `:`. Хост-тип `Vec<u8>` должен содержать ровно 6 байт.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Macaddr;

impl ScalarCodec for Macaddr {
    type Value = [u8; MAC_LEN];
    type Native = Vec<u8>;

    const TYPE_NAME: &'static str = "macaddr";

    fn decode_text_value(src: &[u8]) -> ElementResult<[u8; MAC_LEN]> {
        let s = as_utf8(Self::TYPE_NAME, src)?;
        let sep = if s.contains('-') { '-' } else { ':' };

        let mut out = [0u8; MAC_LEN];
        let mut parts = s.split(sep);
        for (i, slot) in out.iter_mut().enumerate() {
            let part = parts.next().ok_or_else(|| {
                ElementError::malformed(Self::TYPE_NAME, format!("{s:?}: expected 6 octets, got {i}"))
            })?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(ElementError::malformed(
                    Self::TYPE_NAME,
                    format!("{s:?}: octet {part:?} must be two hex digits"),
                ));
            }
            *slot = u8::from_str_radix(part, 16)
                .map_err(|e| ElementError::malformed(Self::TYPE_NAME, format!("{s:?}: {e}")))?;
        }
        if parts.next().is_some() {
            return Err(ElementError::malformed(
                Self::TYPE_NAME,
                format!("{s:?}: more than 6 octets"),
            ));
        }
        Ok(out)
    }

    fn encode_text_value(
        value: &[u8; MAC_LEN],
        buf: &mut Vec<u8>,
    ) -> ElementResult<()> {
        let text = value
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(":");
        buf.extend_from_slice(text.as_bytes());
        Ok(())
    }

    fn decode_binary_value(src: &[u8]) -> ElementResult<[u8; MAC_LEN]> {
        expect_len(Self::TYPE_NAME, src, MAC_LEN)?;
        let mut out = [0u8; MAC_LEN];
        out.copy_from_slice(src);
        Ok(out)
    }

    fn encode_binary_value(
        value: &[u8; MAC_LEN],
        buf: &mut Vec<u8>,
    ) -> ElementResult<()> {
        buf.extend_from_slice(value);
        Ok(())
    }

    fn from_native(native: &Vec<u8>) -> ElementResult<[u8; MAC_LEN]> {
        <[u8; MAC_LEN]>::try_from(native.as_slice()).map_err(|_| {
            ElementError::unconvertible(
                Self::TYPE_NAME,
                format!("{}-byte hardware address", native.len()),
            )
        })
    }

    fn to_native(value: &[u8; MAC_LEN]) -> ElementResult<Vec<u8>> {
        Ok(value.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: [u8; 6] = [0x08, 0x00, 0x2b, 0x01, 0x02, 0x03];

    #[test]
    fn test_text_separators() {
        assert_eq!(Macaddr::decode_text_value(b"08:00:2b:01:02:03").unwrap(), ADDR);
        assert_eq!(Macaddr::decode_text_value(b"08-00-2B-01-02-03").unwrap(), ADDR);

        let mut buf = Vec::new();
        Macaddr::encode_text_value(&ADDR, &mut buf).unwrap();
        assert_eq!(buf, b"08:00:2b:01:02:03");
    }

    #[test]
    fn test_text_malformed() {
        for bad in [
            &b"08:00:2b:01:02"[..],
            b"08:00:2b:01:02:03:04",
            b"8:00:2b:01:02:03",
            b"zz:00:2b:01:02:03",
            b"",
        ] {
            assert!(Macaddr::decode_text_value(bad).is_err(), "{bad:?}");
        }
    }

    /// Тест проверяет, что адрес неверной длины — это ошибка конвертации,
    /// а не разбора.
    #[test]
    fn test_native_wrong_length_unconvertible() {
        let err = Macaddr::from_native(&vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap_err();
        assert_eq!(
            err,
            ElementError::unconvertible("macaddr", "8-byte hardware address")
        );
        assert_eq!(Macaddr::from_native(&ADDR.to_vec()).unwrap(), ADDR);
    }

    #[test]
    fn test_binary() {
        assert_eq!(Macaddr::decode_binary_value(&ADDR).unwrap(), ADDR);
        assert!(Macaddr::decode_binary_value(&ADDR[..5]).is_err());
    }
}
