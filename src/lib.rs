/// Canonical N-dimensional array value: dimensions, elements, status.
pub mod array;
/// Text and binary wire forms of arrays.
pub mod codec;
/// Codec limits loaded from defaults, file and environment.
pub mod config;
/// Type lookup and limits passed to every operation.
pub mod context;
/// Host values <-> canonical arrays with fallback and retry chains.
pub mod convert;
/// Driver glue: scanning column values and producing query parameters.
pub mod driver;
/// Flexible logging (formatting, filters, sinks).
pub mod logging;
/// Type name -> wire type identifier registry.
pub mod registry;
/// Scalar element codecs.
pub mod scalar;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Array model.
pub use array::{Array, Dimension, Element, Status, DEFAULT_LOWER_BOUND};
/// Binary header for inspection without decoding elements.
pub use codec::binary::ArrayHeader;
/// Limits.
pub use config::CodecSettings;
/// Operation context.
pub use context::CodecContext;
/// Conversion shapes and capability traits.
pub use convert::{AsSequence, AssignTarget, HostTarget, HostValue, HostWrapper};
/// Driver values.
pub use driver::WireValue;
/// Errors and result types.
pub use pgarray_error::{
    ArrayError, ArrayResult, ElementError, ElementResult, ErrorExt, StackError, StatusCode,
    WireFormat,
};
/// Type registry.
pub use registry::{default_registry, TypeLookup, TypeRegistry};
/// Element codecs.
pub use scalar::{AclItem, Date, DateValue, Int4, Macaddr, ScalarCodec, Text};

/// `aclitem[]`
pub type AclItemArray = Array<AclItem>;
/// `date[]`
pub type DateArray = Array<Date>;
/// `int4[]`
pub type Int4Array = Array<Int4>;
/// `macaddr[]`
pub type MacaddrArray = Array<Macaddr>;
/// `text[]`
pub type TextArray = Array<Text>;
