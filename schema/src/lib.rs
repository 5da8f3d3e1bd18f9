//! Runtime half of wirecast: a schema model for fixed-width little-endian
//! records, plus the size, encode and decode routines synthesized from it.
//!
//! ```
//! use wirecast_schema::*;
//!
//! let schema = TypeSchema::composite("Point", vec![
//!     Field::new("X", TypeSchema::primitive(Primitive::Int16)),
//!     Field::new("Label", TypeSchema::primitive(Primitive::String))
//!         .with_options(FieldOptions::max_length(8)),
//! ]);
//! let codec = Codec::new(schema).unwrap();
//!
//! let value = Value::Object(vec![Value::Int16(-2), Value::String("ab".to_owned())]);
//! let bytes = codec.encode(&value).unwrap();
//! assert_eq!(bytes, [0xfe, 0xff, 2, 0, 0, 0, b'a', b'b']);
//! assert_eq!(codec.size_of(&value), bytes.len());
//! assert_eq!(codec.decode(&bytes).unwrap(), value);
//! ```

pub mod bb;
pub mod codec;
pub mod decode;
pub mod encode;
pub mod error;
pub mod options;
pub mod schema;
pub mod size;
pub mod traits;
pub mod value;
pub mod verifier;

pub use bb::*;
pub use codec::Codec;
pub use decode::{synthesize_decode, DecodeRoutine};
pub use encode::{synthesize_encode, EncodeRoutine};
pub use error::*;
pub use options::FieldOptions;
pub use schema::*;
pub use size::{synthesize_size, Size, SizeRoutine, LEN_PREFIX};
pub use traits::Encoded;
pub use value::*;
pub use verifier::verify_schema;
