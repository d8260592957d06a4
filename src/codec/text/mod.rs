//! Текстовая форма массива: `{...}` с запятыми, кавычками и `\`-экранированием.

pub mod decoder;
pub mod encoder;

pub use decoder::{decode, parse, RawTextArray};
pub use encoder::{encode, needs_quoting, quote_if_needed};

/// Пробельные символы текстовой формы: ASCII-пробелы плюс `\v`.
pub fn is_array_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}
