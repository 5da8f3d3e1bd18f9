use crate::error::CompileError;

pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("{:?}", text))
}

pub fn error(msg: &str, line: usize, column: usize) -> CompileError {
    CompileError::ParseError { msg: msg.to_owned(), line, column }
}

pub fn resolve_error(msg: &str, line: usize, column: usize) -> CompileError {
    CompileError::ResolveError { msg: msg.to_owned(), line, column }
}
