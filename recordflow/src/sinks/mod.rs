//! Output sinks materializing completed record streams.

mod json_lang;

pub use json_lang::JsonLangSink;
