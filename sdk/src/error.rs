use thiserror::Error;
use wirecast_compiler::CompileError;
use wirecast_schema::{DecodeError, EncodeError, SchemaError};

use crate::json::JsonError;

/// Any failure surfaced by the wirecast facade.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("invalid value: {0}")]
    Json(#[from] JsonError),

    #[error("malformed JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
