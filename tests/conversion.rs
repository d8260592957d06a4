use pgarray::{
    Array, AssignTarget, CodecContext, CodecSettings, Date, DateValue, Element, HostTarget,
    HostValue, HostWrapper, Int4, Macaddr, StatusCode, Text,
};

fn ctx() -> CodecContext {
    CodecContext::default()
}

/// Именованная последовательность поверх `Vec<String>`.
#[derive(Debug, Clone)]
struct Tags(Vec<String>);

impl AsRef<[String]> for Tags {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}

/// Значение, которое может отсутствовать.
struct Nullable(Option<Vec<i32>>);

impl HostWrapper<Int4> for Nullable {
    fn inner(&self) -> Option<HostValue<Int4>> {
        Some(HostValue::Natives(self.0.clone()))
    }
}

/// Цель, которая хранит список строк в своём поле.
#[derive(Default)]
struct TagSet {
    tags: Option<Vec<Option<String>>>,
}

impl AssignTarget<Text> for TagSet {
    fn alternate(&mut self) -> Option<HostTarget<'_, Text>> {
        Some(HostTarget::OptionalNatives(&mut self.tags))
    }
}

#[test]
fn test_named_sequence_matches_plain_sequence() {
    let words = vec!["a".to_string(), "b c".to_string()];
    let plain = Array::<Text>::from_host(&ctx(), HostValue::natives(words.clone())).unwrap();
    let named = Array::<Text>::from_host(&ctx(), HostValue::sequence(Tags(words))).unwrap();
    assert_eq!(plain, named);

    let mut buf = Vec::new();
    named.encode_text(&ctx(), &mut buf).unwrap();
    assert_eq!(buf, br#"{a,"b c"}"#);
}

#[test]
fn test_wrapper_with_null_payload() {
    let a = Array::<Int4>::from_host(&ctx(), HostValue::wrapped(Nullable(None))).unwrap();
    assert!(a.is_null());

    let b = Array::<Int4>::from_host(&ctx(), HostValue::wrapped(Nullable(Some(vec![4, 5]))))
        .unwrap();
    assert_eq!(b, Array::from_values([4, 5]));
}

#[test]
fn test_host_roundtrip_through_text() {
    let ctx = ctx();
    let source = Array::<Int4>::from_host(&ctx, vec![1, -2, 3].into()).unwrap();
    let mut buf = Vec::new();
    source.encode_text(&ctx, &mut buf).unwrap();

    let decoded = Array::<Int4>::decode_text(&ctx, Some(&buf)).unwrap();
    assert_eq!(decoded.to_natives(&ctx).unwrap(), Some(vec![1, -2, 3]));
}

#[test]
fn test_null_elements_need_optional_target() {
    let array = Array::<Text>::decode_text(&ctx(), Some(b"{x,NULL}")).unwrap();

    let err = array.to_natives(&ctx()).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::NullViolation);

    let mut set = TagSet::default();
    array
        .assign_to(&ctx(), HostTarget::Custom(&mut set))
        .unwrap();
    assert_eq!(set.tags, Some(vec![Some("x".to_string()), None]));
}

#[test]
fn test_infinite_date_has_no_host_value() {
    let array = Array::<Date>::decode_text(&ctx(), Some(b"{infinity}")).unwrap();
    assert_eq!(array.elements[0], Element::Present(DateValue::Infinity));
    let err = array.to_natives(&ctx()).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::ConversionFailed);
}

#[test]
fn test_bad_hardware_address_length() {
    let err = Array::<Macaddr>::from_host(&ctx(), HostValue::natives(vec![vec![1, 2, 3]]))
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::ConversionFailed);
}

#[test]
fn test_host_size_limit() {
    let settings = CodecSettings {
        max_elements: 3,
        ..CodecSettings::default()
    };
    let ctx = CodecContext::default().with_settings(settings);
    let err = Array::<Int4>::from_host(&ctx, HostValue::natives(vec![0; 4])).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::SizeLimit);
}
