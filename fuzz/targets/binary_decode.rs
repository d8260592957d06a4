#![no_main]

use libfuzzer_sys::fuzz_target;
use pgarray::{Array, CodecContext, Int4};

fuzz_target!(|data: &[u8]| {
    let ctx = CodecContext::default();
    let Ok(array) = Array::<Int4>::decode_binary(&ctx, Some(data)) else {
        return;
    };
    // Перекодирование не должно падать, а результат разбирается в то же
    // значение.
    let mut buf = Vec::new();
    array.encode_binary(&ctx, &mut buf).expect("encode after successful decode");
    let again = Array::<Int4>::decode_binary(&ctx, Some(&buf)).expect("re-decode");
    assert_eq!(again, array);
});
