use crate::error::{DecodeError, EncodeError};

/// Implemented by the Rust code `wirecast gen-rust` emits. Each type carries
/// its own size, encode and decode routines inlined for its exact shape.
pub trait Encoded: Sized {
    /// Number of bytes [encode_into](#tymethod.encode_into) writes.
    fn size_of(&self) -> usize;

    /// Writes `self` at the start of `buf`, returning the byte count.
    fn encode_into(&self, buf: &mut [u8]) -> Result<usize, EncodeError>;

    /// Decodes from the front of `buf` into `obj`, returning the number of
    /// bytes consumed. Trailing bytes are allowed.
    fn decode_prefix(buf: &[u8], obj: &mut Self) -> Result<usize, DecodeError>;

    fn decode_exact(buf: &[u8], obj: &mut Self) -> Result<(), DecodeError> {
        let n = Self::decode_prefix(buf, obj)?;
        if n != buf.len() {
            return Err(DecodeError::TrailingBytes(buf.len() - n));
        }
        Ok(())
    }

    fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buf = vec![0; self.size_of()];
        let n = self.encode_into(&mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }
}
