use tracing::debug;

use crate::{
    bb::{ByteBuffer, ByteBufferMut},
    decode::{synthesize_decode, DecodeRoutine},
    encode::{synthesize_encode, EncodeRoutine},
    error::{DecodeError, EncodeError, SchemaError},
    schema::TypeSchema,
    size::{synthesize_size, Size},
    value::Value,
    verifier::verify_schema,
};

/// The three routines synthesized for one verified top-level schema.
///
/// Building a codec walks the schema once; the routines it holds are
/// immutable afterwards and may be shared between threads.
pub struct Codec {
    schema: TypeSchema,
    zero:   Value,
    size:   Size,
    encode: EncodeRoutine,
    decode: DecodeRoutine,
}

impl Codec {
    pub fn new(schema: TypeSchema) -> Result<Codec, SchemaError> {
        verify_schema(&schema)?;

        let size = synthesize_size(&schema);
        let encode = synthesize_encode(&schema);
        let decode = synthesize_decode(&schema);
        debug!(%schema, static_size = ?size.static_size(), "built codec");

        Ok(Codec { zero: Value::zero(&schema), schema, size, encode, decode })
    }

    pub fn schema(&self) -> &TypeSchema {
        &self.schema
    }

    /// The encoded size shared by every value, when the schema allows one.
    pub fn static_size(&self) -> Option<usize> {
        self.size.static_size()
    }

    pub fn zero_value(&self) -> Value {
        self.zero.clone()
    }

    /// Number of bytes [encode](#method.encode) produces for `value`.
    pub fn size_of(&self, value: &Value) -> usize {
        self.size.of(value)
    }

    /// Encodes `value` at the start of `buf` and returns the number of bytes
    /// written. Fails up front if `buf` is shorter than
    /// [size_of](#method.size_of) reports.
    pub fn encode_into(&self, buf: &mut [u8], value: &Value) -> Result<usize, EncodeError> {
        let needed = self.size_of(value);
        if buf.len() < needed {
            return Err(EncodeError::BufferTooSmall { needed, available: buf.len() });
        }

        let mut bb = ByteBufferMut::new(buf);
        (self.encode)(value, &mut bb)?;
        debug_assert_eq!(bb.len(), needed);
        Ok(bb.len())
    }

    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let mut buf = vec![0; self.size_of(value)];
        let n = self.encode_into(&mut buf, value)?;
        buf.truncate(n);
        Ok(buf)
    }

    /// Decodes one value from the front of `buf` into `value` and returns the
    /// number of bytes consumed. Trailing bytes are allowed.
    pub fn decode_prefix(&self, buf: &[u8], value: &mut Value) -> Result<usize, DecodeError> {
        let mut bb = ByteBuffer::new(buf);
        (self.decode)(&mut bb, value)?;
        Ok(bb.index())
    }

    /// Like [decode_prefix](#method.decode_prefix) but every byte of `buf`
    /// must be consumed.
    pub fn decode_exact(&self, buf: &[u8], value: &mut Value) -> Result<(), DecodeError> {
        let n = self.decode_prefix(buf, value)?;
        if n != buf.len() {
            return Err(DecodeError::TrailingBytes(buf.len() - n));
        }
        Ok(())
    }

    /// Exact decode into a fresh zero value.
    pub fn decode(&self, buf: &[u8]) -> Result<Value, DecodeError> {
        let mut value = self.zero_value();
        self.decode_exact(buf, &mut value)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::FieldOptions;
    use crate::schema::{Field, Primitive};

    fn foo_codec() -> Codec {
        Codec::new(TypeSchema::composite("MaxLenStringStruct", vec![Field::new(
            "Foo",
            TypeSchema::primitive(Primitive::String),
        )
        .with_options(FieldOptions::max_length(3))]))
        .unwrap()
    }

    fn foo(s: &str) -> Value {
        Value::Object(vec![Value::String(s.to_owned())])
    }

    #[test]
    fn codec_maxlen_string() {
        let codec = foo_codec();
        assert_eq!(codec.encode(&foo("abc")), Ok(vec![3, 0, 0, 0, 97, 98, 99]));
        assert_eq!(
            codec.encode(&foo("abcd")),
            Err(EncodeError::MaxLengthExceeded { len: 4, max: 3 })
        );
        assert_eq!(
            codec.decode(&[4, 0, 0, 0, 97, 98, 99, 100]),
            Err(DecodeError::MaxLengthExceeded { len: 4, max: 3 })
        );
        assert_eq!(codec.decode(&[3, 0, 0, 0, 97, 98, 99]), Ok(foo("abc")));
    }

    #[test]
    fn codec_prefix_and_exact() {
        let codec = foo_codec();
        let buf = [1, 0, 0, 0, b'x', 0xaa, 0xbb];
        let mut value = codec.zero_value();
        assert_eq!(codec.decode_prefix(&buf, &mut value), Ok(5));
        assert_eq!(value, foo("x"));
        assert_eq!(codec.decode_exact(&buf, &mut value), Err(DecodeError::TrailingBytes(2)));
    }

    #[test]
    fn codec_encode_into_checks_capacity() {
        let codec = foo_codec();
        let mut small = [0u8; 6];
        assert_eq!(
            codec.encode_into(&mut small, &foo("abc")),
            Err(EncodeError::BufferTooSmall { needed: 7, available: 6 })
        );
        assert_eq!(small, [0; 6]);

        let mut big = [0xffu8; 10];
        assert_eq!(codec.encode_into(&mut big, &foo("ab")), Ok(6));
        assert_eq!(big, [2, 0, 0, 0, 97, 98, 0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn codec_rejects_unverified_schema() {
        assert!(matches!(
            Codec::new(TypeSchema::primitive(Primitive::Int32)),
            Err(SchemaError::NotComposite(_))
        ));
    }

    #[test]
    fn codec_static_size() {
        let codec = Codec::new(TypeSchema::composite("Fixed", vec![
            Field::new("A", TypeSchema::primitive(Primitive::Int64)),
            Field::new("B", TypeSchema::fixed_array(TypeSchema::primitive(Primitive::Uint8), 4)),
        ]))
        .unwrap();
        assert_eq!(codec.static_size(), Some(12));
        assert_eq!(foo_codec().static_size(), None);
    }
}
