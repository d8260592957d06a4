pub mod settings;

pub use settings::{
    CodecSettings, DEFAULT_MAX_DIMENSIONS, DEFAULT_MAX_ELEMENTS, DEFAULT_MAX_UNWRAP_DEPTH,
};
