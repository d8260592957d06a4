//! Бинарная форма массива.
//!
//! Все целые — знаковые 32-битные big-endian:
//! `ndims, contains_null, element_type_id`, затем `length, lower_bound` на
//! каждую размерность, затем для каждого элемента длина и столько же байт
//! (`-1` — NULL без полезной нагрузки).

pub mod decoder;
pub mod encoder;
pub mod header;

pub use decoder::{decode, NULL_LENGTH};
pub use encoder::encode;
pub use header::{ArrayHeader, DIMENSION_LEN, FIXED_HEADER_LEN};
