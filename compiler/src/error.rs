use thiserror::Error;
use wirecast_schema::SchemaError;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}, column {column}: {msg}")]
    ParseError {
        msg:    String,
        line:   usize,
        column: usize,
    },

    #[error("Resolve error at line {line}, column {column}: {msg}")]
    ResolveError {
        msg:    String,
        line:   usize,
        column: usize,
    },

    #[error("Unknown root type \"{0}\"")]
    UnknownRoot(String),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Codegen error: {0}")]
    CodegenError(String),
}
