use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use pgarray_error::{ensure, ArrayError, ArrayResult, WireFormat};

use crate::{array::Dimension, config::CodecSettings};

/// Размер фиксированной части заголовка: кол-во размерностей, флаг NULL и
/// идентификатор типа элемента.
pub const FIXED_HEADER_LEN: usize = 12;

/// Размер описания одной размерности: длина и нижняя граница.
pub const DIMENSION_LEN: usize = 8;

/// Заголовок бинарной формы массива.
///
/// `contains_null` и `element_type_id` только информативны: декодер их не
/// проверяет.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayHeader {
    pub contains_null: bool,
    pub element_type_id: u32,
    pub dimensions: Vec<Dimension>,
}

impl ArrayHeader {
    /// Длина заголовка на wire.
    pub fn encoded_len(&self) -> usize {
        FIXED_HEADER_LEN + self.dimensions.len() * DIMENSION_LEN
    }

    /// Читает заголовок из начала `src`. Возвращает заголовок и кол-во
    /// прочитанных байт.
    pub fn decode(
        src: &[u8],
        settings: &CodecSettings,
    ) -> ArrayResult<(Self, usize)> {
        let mut r = src;

        let ndims = r.read_i32::<BigEndian>().map_err(|_| truncated(src.len()))?;
        let null_flag = r.read_i32::<BigEndian>().map_err(|_| truncated(src.len()))?;
        let element_type_id = r.read_u32::<BigEndian>().map_err(|_| truncated(src.len()))?;

        ensure!(
            ndims >= 0,
            ArrayError::malformed(
                WireFormat::Binary,
                format!("invalid number of dimensions: {ndims}"),
            )
            .with_position(0)
        );
        let ndims = ndims as usize;
        ensure!(
            ndims <= settings.max_dimensions,
            ArrayError::malformed(
                WireFormat::Binary,
                format!(
                    "number of dimensions ({ndims}) exceeds the maximum allowed ({})",
                    settings.max_dimensions
                ),
            )
            .with_position(0)
        );

        let mut dimensions = Vec::with_capacity(ndims);
        for i in 0..ndims {
            let pos = FIXED_HEADER_LEN + i * DIMENSION_LEN;
            let length = r.read_i32::<BigEndian>().map_err(|_| truncated(src.len()))?;
            let lower_bound = r.read_i32::<BigEndian>().map_err(|_| truncated(src.len()))?;
            ensure!(
                length >= 0,
                ArrayError::malformed(
                    WireFormat::Binary,
                    format!("invalid length {length} for dimension {i}"),
                )
                .with_position(pos)
            );
            let dim = Dimension::new(length as u32, lower_bound);
            ensure!(
                dim.has_valid_upper_bound(),
                ArrayError::malformed(
                    WireFormat::Binary,
                    format!("upper bound of dimension {i} overflows int4"),
                )
                .with_position(pos)
            );
            dimensions.push(dim);
        }

        let header = Self {
            contains_null: null_flag != 0,
            element_type_id,
            dimensions,
        };
        let consumed = src.len() - r.len();
        Ok((header, consumed))
    }

    /// Дописывает заголовок в `buf`.
    pub fn encode(
        &self,
        buf: &mut Vec<u8>,
    ) -> ArrayResult<()> {
        let ndims = i32::try_from(self.dimensions.len()).map_err(|_| ArrayError::SizeLimit {
            what: "dimension count".to_string(),
            size: self.dimensions.len(),
            limit: i32::MAX as usize,
        })?;

        buf.reserve(self.encoded_len());
        buf.write_i32::<BigEndian>(ndims)?;
        buf.write_i32::<BigEndian>(i32::from(self.contains_null))?;
        buf.write_u32::<BigEndian>(self.element_type_id)?;
        for d in &self.dimensions {
            let length = i32::try_from(d.length).map_err(|_| ArrayError::SizeLimit {
                what: "dimension length".to_string(),
                size: d.length as usize,
                limit: i32::MAX as usize,
            })?;
            buf.write_i32::<BigEndian>(length)?;
            buf.write_i32::<BigEndian>(d.lower_bound)?;
        }
        Ok(())
    }
}

fn truncated(len: usize) -> pgarray_error::StackError {
    ArrayError::malformed(
        WireFormat::Binary,
        format!("array header truncated ({len} bytes available)"),
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let header = ArrayHeader {
            contains_null: true,
            element_type_id: 23,
            dimensions: vec![Dimension::new(2, 4)],
        };
        let mut buf = Vec::new();
        header.encode(&mut buf).unwrap();
        assert_eq!(
            buf,
            [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 23, 0, 0, 0, 2, 0, 0, 0, 4]
        );
        assert_eq!(buf.len(), header.encoded_len());

        let (decoded, consumed) = ArrayHeader::decode(&buf, &CodecSettings::default()).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(consumed, 20);
    }

    #[test]
    fn test_truncated() {
        let settings = CodecSettings::default();
        assert!(ArrayHeader::decode(&[0, 0, 0], &settings).is_err());
        assert!(ArrayHeader::decode(&[0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 23, 0, 0], &settings).is_err());
    }

    #[test]
    fn test_negative_values() {
        let settings = CodecSettings::default();
        let neg_ndims = [0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0, 0, 0, 0, 23];
        assert!(ArrayHeader::decode(&neg_ndims, &settings).is_err());

        let neg_len = [0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 23, 0xff, 0xff, 0xff, 0xfe, 0, 0, 0, 1];
        let err = ArrayHeader::decode(&neg_len, &settings).unwrap_err();
        assert!(err.to_string().contains("position: 12"), "{err}");
    }

    /// Тест проверяет, что ось с верхней границей за пределами int4
    /// отклоняется при разборе заголовка.
    #[test]
    fn test_upper_bound_overflow() {
        let settings = CodecSettings::default();
        // length 2, lower bound i32::MAX
        let src = [0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 23, 0, 0, 0, 2, 0x7f, 0xff, 0xff, 0xff];
        let err = ArrayHeader::decode(&src, &settings).unwrap_err();
        assert!(err.to_string().contains("overflows int4"), "{err}");
        assert!(err.to_string().contains("position: 12"), "{err}");

        let last = [0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 23, 0, 0, 0, 1, 0x7f, 0xff, 0xff, 0xff];
        let (h, _) = ArrayHeader::decode(&last, &settings).unwrap();
        assert_eq!(h.dimensions, vec![Dimension::new(1, i32::MAX)]);
    }

    #[test]
    fn test_too_many_dimensions() {
        let settings = CodecSettings {
            max_dimensions: 1,
            ..Default::default()
        };
        let src = [0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 23];
        let err = ArrayHeader::decode(&src, &settings).unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum allowed"));
    }

    /// Тест проверяет, что флаг NULL — любое ненулевое значение.
    #[test]
    fn test_null_flag_is_lenient() {
        let src = [0, 0, 0, 0, 0, 0, 0, 7, 0, 0, 0, 25];
        let (h, _) = ArrayHeader::decode(&src, &CodecSettings::default()).unwrap();
        assert!(h.contains_null);
        assert!(h.dimensions.is_empty());
    }
}
