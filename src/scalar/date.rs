use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use chrono::{Datelike, Duration, NaiveDate};
use pgarray_error::{ElementError, ElementResult};
use serde::{Serialize, Serializer};

use super::{as_utf8, expect_len, ScalarCodec};

/// Календарная дата или одна из бесконечностей.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateValue {
    Finite(NaiveDate),
    Infinity,
    NegativeInfinity,
}

impl fmt::Display for DateValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Finite(d) => write!(f, "{:04}-{:02}-{:02}", d.year(), d.month(), d.day()),
            Self::Infinity => f.write_str("infinity"),
            Self::NegativeInfinity => f.write_str("-infinity"),
        }
    }
}

/// Строка в той же форме, что и текст на wire.
impl Serialize for DateValue {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Дата: текст ISO `YYYY-MM-DD`, бинарно — кол-во дней от 2000-01-01 (i32).
///
/// `i32::MAX` и `i32::MIN` на wire означают `infinity` и `-infinity`.
/// Бесконечность в `NaiveDate` не конвертируется.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Date;

const INFINITY_DAYS: i32 = i32::MAX;
const NEG_INFINITY_DAYS: i32 = i32::MIN;

fn epoch() -> NaiveDate {
    // 2000-01-01 всегда валидна
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

impl ScalarCodec for Date {
    type Value = DateValue;
    type Native = NaiveDate;

    const TYPE_NAME: &'static str = "date";

    fn decode_text_value(src: &[u8]) -> ElementResult<DateValue> {
        let s = as_utf8(Self::TYPE_NAME, src)?;
        match s {
            "infinity" => Ok(DateValue::Infinity),
            "-infinity" => Ok(DateValue::NegativeInfinity),
            _ => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(DateValue::Finite)
                .map_err(|e| ElementError::malformed(Self::TYPE_NAME, format!("{s:?}: {e}"))),
        }
    }

    fn encode_text_value(
        value: &DateValue,
        buf: &mut Vec<u8>,
    ) -> ElementResult<()> {
        buf.extend_from_slice(value.to_string().as_bytes());
        Ok(())
    }

    fn decode_binary_value(src: &[u8]) -> ElementResult<DateValue> {
        expect_len(Self::TYPE_NAME, src, 4)?;
        match BigEndian::read_i32(src) {
            INFINITY_DAYS => Ok(DateValue::Infinity),
            NEG_INFINITY_DAYS => Ok(DateValue::NegativeInfinity),
            days => epoch()
                .checked_add_signed(Duration::days(days as i64))
                .map(DateValue::Finite)
                .ok_or_else(|| {
                    ElementError::malformed(Self::TYPE_NAME, format!("day offset {days} out of range"))
                }),
        }
    }

    fn encode_binary_value(
        value: &DateValue,
        buf: &mut Vec<u8>,
    ) -> ElementResult<()> {
        let days = match value {
            DateValue::Finite(d) => {
                let delta = d.signed_duration_since(epoch()).num_days();
                i32::try_from(delta)
                    .ok()
                    .filter(|&v| v != INFINITY_DAYS && v != NEG_INFINITY_DAYS)
                    .ok_or_else(|| {
                        ElementError::malformed(Self::TYPE_NAME, format!("{d} out of range"))
                    })?
            }
            DateValue::Infinity => INFINITY_DAYS,
            DateValue::NegativeInfinity => NEG_INFINITY_DAYS,
        };
        let mut raw = [0u8; 4];
        BigEndian::write_i32(&mut raw, days);
        buf.extend_from_slice(&raw);
        Ok(())
    }

    fn from_native(native: &NaiveDate) -> ElementResult<DateValue> {
        Ok(DateValue::Finite(*native))
    }

    fn to_native(value: &DateValue) -> ElementResult<NaiveDate> {
        match value {
            DateValue::Finite(d) => Ok(*d),
            DateValue::Infinity => Err(ElementError::unconvertible(Self::TYPE_NAME, "infinity")),
            DateValue::NegativeInfinity => {
                Err(ElementError::unconvertible(Self::TYPE_NAME, "-infinity"))
            }
        }
    }
}
