//! Транскодеры wire-форм массива: текстовая и бинарная.

pub mod binary;
pub mod text;

use pgarray_error::ArrayResult;

use crate::{array::Array, context::CodecContext, scalar::ScalarCodec};

////////////////////////////////////////////////////////////////////////////////
// Операции Array
////////////////////////////////////////////////////////////////////////////////

impl<S: ScalarCodec> Array<S> {
    /// Декодирует текстовую форму. `None` — NULL массив.
    pub fn decode_text(
        ctx: &CodecContext,
        src: Option<&[u8]>,
    ) -> ArrayResult<Self> {
        text::decode(ctx, src)
    }

    /// Дописывает текстовую форму в `buf`. `false` — NULL, байтов нет.
    pub fn encode_text(
        &self,
        ctx: &CodecContext,
        buf: &mut Vec<u8>,
    ) -> ArrayResult<bool> {
        text::encode(ctx, self, buf)
    }

    /// Декодирует бинарную форму. `None` — NULL массив.
    pub fn decode_binary(
        ctx: &CodecContext,
        src: Option<&[u8]>,
    ) -> ArrayResult<Self> {
        binary::decode(ctx, src)
    }

    /// Дописывает бинарную форму в `buf`. `false` — NULL, байтов нет.
    pub fn encode_binary(
        &self,
        ctx: &CodecContext,
        buf: &mut Vec<u8>,
    ) -> ArrayResult<bool> {
        binary::encode(ctx, self, buf)
    }
}
