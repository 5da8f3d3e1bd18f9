use thiserror::Error;

/// Raised while verifying a schema or building its routines. Never seen at
/// encode/decode time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("the top-level type must be a struct, found {0}")]
    NotComposite(String),

    #[error("invalid option tag {tag:?}: {msg}")]
    InvalidTag { tag: String, msg: String },

    #[error("field {0} is ignored with \"-\" but has options")]
    IgnoreWithOptions(String),

    #[error("omitempty is only valid for array, slice, map and string (field {0})")]
    OmitEmptyInvalidKind(String),

    #[error("omitempty option can only be used on the last field in a struct (field {0})")]
    OmitEmptyNotLast(String),

    #[error("omitempty option can only be used on a top-level struct (field {0})")]
    OmitEmptyNotTopLevel(String),

    #[error("maxlen is only valid for slice, string and map (field {0})")]
    MaxLengthInvalidKind(String),

    #[error("a slice of an empty encoded struct is not allowed ({0})")]
    EmptyCompositeInList(String),
}

/// Raised by an encode routine. Bytes written before the failure stay in the
/// buffer; the buffer must not be treated as a valid encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("length {0} exceeds the 4-byte length prefix")]
    LengthOverflow(usize),

    #[error("length {len} exceeds maxlen {max}")]
    MaxLengthExceeded { len: usize, max: u64 },

    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("value does not match schema: expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("fixed array of {expected} elements given {found}")]
    ArrayLength { expected: usize, found: usize },

    #[error("struct value has no slot for field {0}")]
    MissingField(String),

    #[error("duplicate map key")]
    MapDuplicateKey,
}

/// Raised by a decode routine. Aborts the decode of the whole top-level value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("buffer underflow")]
    BufferUnderflow,

    #[error("length {len} exceeds maxlen {max}")]
    MaxLengthExceeded { len: usize, max: u64 },

    #[error("duplicate map key")]
    MapDuplicateKey,

    #[error("{0} bytes remain after decoding")]
    TrailingBytes(usize),

    #[error("invalid bool byte {0}")]
    InvalidBool(u8),

    #[error("string is not valid UTF-8")]
    InvalidUtf8,
}
