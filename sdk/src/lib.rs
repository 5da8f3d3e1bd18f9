//! wirecast
//!
//! Facade over the wirecast workspace:
//!
//! - the runtime codec, buffers, `Value` and `Encoded` (from `wirecast-schema`),
//! - the `.wire` front end and Rust generator (from `wirecast-compiler`),
//! - a JSON bridge for `Value` and an umbrella [Error].
//!
//! Code emitted by `wcast gen-rust` imports its runtime from this crate.

pub mod error;
pub mod json;

pub use error::Error;
pub use json::{from_json, to_json, JsonError};
pub use wirecast_compiler::{
    compile_schema, compile_schema_to_rust, compile_schemas_to_rust, parse_declarations, resolve_schema,
    CompileError, GenOptions,
};
pub use wirecast_schema::*;

/// Compiles `text` and builds a codec for the struct or alias named `root`.
pub fn codec_from_source(text: &str, root: &str) -> Result<Codec, Error> {
    let schema = compile_schema(text, root)?;
    Ok(Codec::new(schema)?)
}

/// Decode an exact encoding into a pretty-printed JSON string.
pub fn decode_to_json(codec: &Codec, buffer: &[u8]) -> Result<String, Error> {
    let value = codec.decode(buffer)?;
    Ok(serde_json::to_string_pretty(&to_json(codec.schema(), &value))?)
}

/// Parse JSON text into a value of the codec's schema and encode it.
pub fn encode_from_json(codec: &Codec, text: &str) -> Result<Vec<u8>, Error> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    let value = from_json(codec.schema(), &json)?;
    Ok(codec.encode(&value)?)
}
