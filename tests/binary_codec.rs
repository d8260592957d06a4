use std::sync::Arc;

use pgarray::{
    AclItem, Array, ArrayHeader, CodecContext, CodecSettings, Date, DateValue, Dimension,
    Element, Int4, Macaddr, StatusCode, Text, TypeRegistry,
};

fn ctx() -> CodecContext {
    CodecContext::default()
}

fn binary_of<S: pgarray::ScalarCodec>(array: &Array<S>) -> Vec<u8> {
    let mut buf = Vec::new();
    assert!(array.encode_binary(&ctx(), &mut buf).unwrap());
    buf
}

#[test]
fn test_int4_wire_layout() {
    let array = Array::<Int4>::from_elements(vec![Element::Present(1), Element::Null]);
    let bytes = binary_of(&array);
    assert_eq!(
        hex::encode(&bytes),
        concat!(
            "00000001", // ndims
            "00000001", // contains null
            "00000017", // int4
            "00000002", "00000001", // length, lower bound
            "00000004", "00000001", // 1
            "ffffffff", // NULL
        )
    );
}

#[test]
fn test_text_and_binary_agree() {
    let ctx = ctx();
    let from_text =
        Array::<Int4>::decode_text(&ctx, Some(b"[0:1][1:3]={{1,2,3},{4,NULL,6}}")).unwrap();
    let bytes = binary_of(&from_text);
    let from_binary = Array::<Int4>::decode_binary(&ctx, Some(&bytes)).unwrap();
    assert_eq!(from_binary, from_text);

    let mut text = Vec::new();
    from_binary.encode_text(&ctx, &mut text).unwrap();
    assert_eq!(text, b"[0:1][1:3]={{1,2,3},{4,NULL,6}}");
}

#[test]
fn test_empty_array_header_only() {
    let bytes = binary_of(&Array::<Text>::empty());
    assert_eq!(bytes.len(), 12);
    let back = Array::<Text>::decode_binary(&ctx(), Some(&bytes)).unwrap();
    assert!(back.is_present());
    assert!(back.dimensions.is_empty());
}

/// Тест проверяет, что измерение нулевой длины сохраняется в бинарной
/// форме, но в тексте становится `{}`.
#[test]
fn test_zero_length_dimension() {
    let array = Array::<Int4>::new(Vec::new(), vec![Dimension::new(0, 1)]).unwrap();
    let bytes = binary_of(&array);
    let back = Array::<Int4>::decode_binary(&ctx(), Some(&bytes)).unwrap();
    assert_eq!(back.dimensions, vec![Dimension::new(0, 1)]);

    let mut text = Vec::new();
    back.encode_text(&ctx(), &mut text).unwrap();
    assert_eq!(text, b"{}");
}

#[test]
fn test_null_array_has_no_bytes() {
    let mut buf = vec![0xAA];
    assert!(!Array::<Int4>::null().encode_binary(&ctx(), &mut buf).unwrap());
    assert_eq!(buf, vec![0xAA]);
    assert!(Array::<Int4>::decode_binary(&ctx(), None).unwrap().is_null());
}

#[test]
fn test_truncated_input_is_malformed() {
    let bytes = binary_of(&Array::<Int4>::from_values([10, 20, 30]));
    for cut in [0, 4, 11, 15, bytes.len() - 1] {
        let err = Array::<Int4>::decode_binary(&ctx(), Some(&bytes[..cut])).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::DecodingError, "cut at {cut}");
    }
}

#[test]
fn test_trailing_bytes_are_tolerated() {
    let mut bytes = binary_of(&Array::<Int4>::from_values([1]));
    bytes.extend_from_slice(&[0, 0, 0]);
    let back = Array::<Int4>::decode_binary(&ctx(), Some(&bytes)).unwrap();
    assert_eq!(back.elements, vec![Element::Present(1)]);
}

#[test]
fn test_element_limit() {
    let bytes = binary_of(&Array::<Int4>::from_values([1, 2, 3]));
    let settings = CodecSettings {
        max_elements: 2,
        ..CodecSettings::default()
    };
    let small = CodecContext::default().with_settings(settings);
    let err = Array::<Int4>::decode_binary(&small, Some(&bytes)).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::DecodingError);
}

#[test]
fn test_unknown_element_type() {
    let ctx = CodecContext::new(Arc::new(TypeRegistry::new()), CodecSettings::default());
    let mut buf = Vec::new();
    let err = Array::<Int4>::from_values([1])
        .encode_binary(&ctx, &mut buf)
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::UnresolvedType);
    assert!(buf.is_empty());
}

#[test]
fn test_custom_registry_oid() {
    let registry = TypeRegistry::with_defaults();
    registry.register("int4", 90_000);
    let ctx = CodecContext::new(Arc::new(registry), CodecSettings::default());
    let mut buf = Vec::new();
    Array::<Int4>::from_values([5])
        .encode_binary(&ctx, &mut buf)
        .unwrap();
    let (header, _) = ArrayHeader::decode(&buf, &ctx.settings).unwrap();
    assert_eq!(header.element_type_id, 90_000);
}

#[test]
fn test_binary_for_other_types() {
    let dates = Array::<Date>::from_elements(vec![
        Element::Present(DateValue::Infinity),
        Element::Null,
    ]);
    let back = Array::<Date>::decode_binary(&ctx(), Some(&binary_of(&dates))).unwrap();
    assert_eq!(back, dates);

    let macs = Array::<Macaddr>::from_values([[1, 2, 3, 4, 5, 6]]);
    let back = Array::<Macaddr>::decode_binary(&ctx(), Some(&binary_of(&macs))).unwrap();
    assert_eq!(back, macs);
}

/// Тест проверяет, что тип без бинарной формы элемента даёт ошибку, а не
/// частичный вывод.
#[test]
fn test_aclitem_has_no_binary_form() {
    let array = Array::<AclItem>::from_values(["postgres=r/postgres".to_string()]);
    let mut buf = Vec::new();
    let err = array.encode_binary(&ctx(), &mut buf).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::Unsupported);
    assert!(buf.is_empty());
}
