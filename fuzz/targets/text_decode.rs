#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pgarray::{Array, CodecContext, Int4, Text};

#[derive(Debug, Arbitrary)]
enum ElementKind {
    Int4,
    Text,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    data: Vec<u8>,
    kind: ElementKind,
}

fn check<S: pgarray::ScalarCodec>(
    ctx: &CodecContext,
    data: &[u8],
) {
    // Всё, что разобралось, должно закодироваться и разобраться обратно
    // в то же значение.
    let Ok(array) = Array::<S>::decode_text(ctx, Some(data)) else {
        return;
    };
    let mut buf = Vec::new();
    array.encode_text(ctx, &mut buf).expect("encode after successful decode");
    let again = Array::<S>::decode_text(ctx, Some(&buf)).expect("re-decode canonical text");
    assert_eq!(again, array);
}

fuzz_target!(|input: FuzzInput| {
    let ctx = CodecContext::default();
    match input.kind {
        ElementKind::Int4 => check::<Int4>(&ctx, &input.data),
        ElementKind::Text => check::<Text>(&ctx, &input.data),
    }
});
