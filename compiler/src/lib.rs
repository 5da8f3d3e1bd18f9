//! wirecast-compiler
//!
//! This crate implements:
//!  1) A tokenizer + parser for `.wire` declaration files,
//!  2) Name resolution into a verified `TypeSchema` (unknown, duplicate and recursive types),
//!  3) Code generation (`compile_schema_to_rust` → `String`) of structs with inlined
//!     size/encode/decode routines,
//!  4) Error types (`CompileError`).

pub mod error;
pub mod types;
pub mod utils;
pub mod tokenizer;
pub mod parser;
pub mod compiler;
pub mod gen_rust;

pub use compiler::{compile_schema, parse_declarations, resolve_schema};
pub use error::CompileError;
pub use gen_rust::{compile_schema_to_rust, compile_schemas_to_rust, GenOptions};
