use crate::error::{DecodeError, EncodeError};

/// A wirecast byte buffer meant for reading. All multi-byte values are
/// little-endian.
///
/// Example usage:
///
/// ```
/// let mut bb = wirecast_schema::ByteBuffer::new(&[3, 0, 0, 0, 97, 98, 99, 1]);
/// assert_eq!(bb.read_string(), Ok("abc".to_owned()));
/// assert_eq!(bb.read_bool(), Ok(true));
/// ```
///
pub struct ByteBuffer<'a> {
    data: &'a [u8],
    index: usize,
}

impl<'a> ByteBuffer<'a> {
    /// Create a new ByteBuffer that wraps the provided byte slice. The lifetime
    /// of the returned ByteBuffer must not outlive the lifetime of the byte
    /// slice.
    pub fn new(data: &'a [u8]) -> ByteBuffer<'a> {
        ByteBuffer { data, index: 0 }
    }

    /// Retrieves the underlying byte slice.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Retrieves the current index into the underlying byte slice. This starts
    /// off as 0 and ends up as `self.data().len()` when everything has been
    /// read.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.index
    }

    /// Try to read a boolean value starting at the current index. Only 0 and 1
    /// are accepted.
    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DecodeError::InvalidBool(other)),
        }
    }

    /// Try to read a byte starting at the current index.
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Try to read `len` raw bytes starting at the current index.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::BufferUnderflow);
        }
        let value = &self.data[self.index..self.index + len];
        self.index += len;
        Ok(value)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_i8(&mut self) -> Result<i8, DecodeError> {
        Ok(i8::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16, DecodeError> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    /// Try to read a 32-bit floating-point number from its IEEE-754 bit pattern.
    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Try to read a 64-bit floating-point number from its IEEE-754 bit pattern.
    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Reads a 4-byte length prefix and checks it against the unread bytes and
    /// an optional maximum. The prefix is unsigned; a count larger than what
    /// remains is an underflow even before any element is read.
    pub fn read_len(&mut self, max_length: Option<u64>) -> Result<usize, DecodeError> {
        let len = self.read_u32()? as usize;
        if len > self.remaining() {
            return Err(DecodeError::BufferUnderflow);
        }
        if let Some(max) = max_length {
            if len as u64 > max {
                return Err(DecodeError::MaxLengthExceeded { len, max });
            }
        }
        Ok(len)
    }

    /// Try to read a length-prefixed UTF-8 string starting at the current index.
    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        self.read_string_max(None)
    }

    /// Like [read_string](#method.read_string) but rejects a declared length
    /// above `max_length` before allocating.
    pub fn read_string_max(&mut self, max_length: Option<u64>) -> Result<String, DecodeError> {
        let len = self.read_len(max_length)?;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8)
    }
}

/// A wirecast byte buffer meant for writing into caller-supplied memory.
///
/// Example usage:
///
/// ```
/// let mut out = [0u8; 7];
/// let mut bb = wirecast_schema::ByteBufferMut::new(&mut out);
/// bb.write_string("abc").unwrap();
/// assert_eq!(bb.len(), 7);
/// assert_eq!(out, [3, 0, 0, 0, 97, 98, 99]);
/// ```
///
pub struct ByteBufferMut<'a> {
    data: &'a mut [u8],
    index: usize,
}

impl<'a> ByteBufferMut<'a> {
    /// Wraps `data`; writing starts at offset 0.
    pub fn new(data: &'a mut [u8]) -> ByteBufferMut<'a> {
        ByteBufferMut { data, index: 0 }
    }

    /// Returns the number of bytes written so far.
    pub fn len(&self) -> usize {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.index == 0
    }

    /// The bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.data[..self.index]
    }

    /// Space left after the write cursor.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.index
    }

    /// Write a raw byte slice at the cursor.
    pub fn write_bytes(&mut self, value: &[u8]) -> Result<(), EncodeError> {
        if value.len() > self.remaining() {
            return Err(EncodeError::BufferTooSmall {
                needed: self.index + value.len(),
                available: self.data.len(),
            });
        }
        self.data[self.index..self.index + value.len()].copy_from_slice(value);
        self.index += value.len();
        Ok(())
    }

    /// Write a boolean value as a single 0 or 1 byte.
    pub fn write_bool(&mut self, value: bool) -> Result<(), EncodeError> {
        self.write_u8(if value { 1 } else { 0 })
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), EncodeError> {
        self.write_bytes(&[value])
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), EncodeError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), EncodeError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<(), EncodeError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_i8(&mut self, value: i8) -> Result<(), EncodeError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<(), EncodeError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), EncodeError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<(), EncodeError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), EncodeError> {
        self.write_u32(value.to_bits())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<(), EncodeError> {
        self.write_u64(value.to_bits())
    }

    /// Checks `len` against `max_length` and the 4-byte prefix range, then
    /// writes it. Nothing is written when either check fails.
    pub fn write_len(&mut self, len: usize, max_length: Option<u64>) -> Result<(), EncodeError> {
        check_len(len, max_length)?;
        self.write_u32(len as u32)
    }

    /// Write a length-prefixed UTF-8 string.
    pub fn write_string(&mut self, value: &str) -> Result<(), EncodeError> {
        self.write_string_max(value, None)
    }

    pub fn write_string_max(&mut self, value: &str, max_length: Option<u64>) -> Result<(), EncodeError> {
        self.write_len(value.len(), max_length)?;
        self.write_bytes(value.as_bytes())
    }
}

/// The maxlen check runs first, then the prefix range check.
pub fn check_len(len: usize, max_length: Option<u64>) -> Result<(), EncodeError> {
    if let Some(max) = max_length {
        if len as u64 > max {
            return Err(EncodeError::MaxLengthExceeded { len, max });
        }
    }
    if len as u64 > u32::MAX as u64 {
        return Err(EncodeError::LengthOverflow(len));
    }
    Ok(())
}

#[test]
fn read_bool() {
    let read = |bytes| ByteBuffer::new(bytes).read_bool();
    assert_eq!(read(&[]), Err(DecodeError::BufferUnderflow));
    assert_eq!(read(&[0]), Ok(false));
    assert_eq!(read(&[1]), Ok(true));
    assert_eq!(read(&[2]), Err(DecodeError::InvalidBool(2)));
}

#[test]
fn read_byte() {
    let read = |bytes| ByteBuffer::new(bytes).read_u8();
    assert_eq!(read(&[]), Err(DecodeError::BufferUnderflow));
    assert_eq!(read(&[0]), Ok(0));
    assert_eq!(read(&[1]), Ok(1));
    assert_eq!(read(&[254]), Ok(254));
    assert_eq!(read(&[255]), Ok(255));
}

#[test]
fn read_bytes() {
    let read = |bytes, len| ByteBuffer::new(bytes).read_bytes(len);
    assert_eq!(read(&[], 0), Ok(vec![].as_slice()));
    assert_eq!(read(&[], 1), Err(DecodeError::BufferUnderflow));
    assert_eq!(read(&[0], 0), Ok(vec![].as_slice()));
    assert_eq!(read(&[0], 1), Ok(vec![0].as_slice()));
    assert_eq!(read(&[0], 2), Err(DecodeError::BufferUnderflow));

    let mut bb = ByteBuffer::new(&[1, 2, 3, 4, 5]);
    assert_eq!(bb.read_bytes(3), Ok(vec![1, 2, 3].as_slice()));
    assert_eq!(bb.read_bytes(2), Ok(vec![4, 5].as_slice()));
    assert_eq!(bb.read_bytes(1), Err(DecodeError::BufferUnderflow));
}

#[test]
fn read_fixed_width() {
    assert_eq!(ByteBuffer::new(&[0x34, 0x12]).read_u16(), Ok(0x1234));
    assert_eq!(ByteBuffer::new(&[0x34]).read_u16(), Err(DecodeError::BufferUnderflow));
    assert_eq!(ByteBuffer::new(&[0x78, 0x56, 0x34, 0x12]).read_u32(), Ok(0x1234_5678));
    assert_eq!(ByteBuffer::new(&[0xff, 0xff, 0xff, 0xff]).read_i32(), Ok(-1));
    assert_eq!(ByteBuffer::new(&[0x80]).read_i8(), Ok(-128));
    assert_eq!(ByteBuffer::new(&[0xfe, 0xff]).read_i16(), Ok(-2));
    assert_eq!(
        ByteBuffer::new(&[1, 0, 0, 0, 0, 0, 0, 0x80]).read_i64(),
        Ok(i64::MIN + 1)
    );
    assert_eq!(
        ByteBuffer::new(&[8, 7, 6, 5, 4, 3, 2, 1]).read_u64(),
        Ok(0x0102_0304_0506_0708)
    );
}

#[test]
fn read_floats() {
    let bits = 123.456f32.to_bits().to_le_bytes();
    assert_eq!(ByteBuffer::new(&bits).read_f32(), Ok(123.456));
    let bits = (-0.5f64).to_bits().to_le_bytes();
    assert_eq!(ByteBuffer::new(&bits).read_f64(), Ok(-0.5));
    let nan = f32::NAN.to_bits().to_le_bytes();
    assert!(ByteBuffer::new(&nan).read_f32().map(|f| f.is_nan()).unwrap_or(false));
}

#[test]
fn read_string() {
    let read = |bytes| ByteBuffer::new(bytes).read_string();
    assert_eq!(read(&[]), Err(DecodeError::BufferUnderflow));
    assert_eq!(read(&[0, 0, 0, 0]), Ok("".to_owned()));
    assert_eq!(read(&[1, 0, 0, 0]), Err(DecodeError::BufferUnderflow));
    assert_eq!(read(&[1, 0, 0, 0, 97]), Ok("a".to_owned()));
    assert_eq!(read(&[4, 0, 0, 0, 240, 159, 141, 149]), Ok("🍕".to_owned()));
    assert_eq!(read(&[2, 0, 0, 0, 0xc3, 0x28]), Err(DecodeError::InvalidUtf8));
}

#[test]
fn read_len_checks_remaining_then_max() {
    let mut bb = ByteBuffer::new(&[4, 0, 0, 0, 1, 2, 3]);
    assert_eq!(bb.read_len(Some(1)), Err(DecodeError::BufferUnderflow));

    let mut bb = ByteBuffer::new(&[4, 0, 0, 0, 1, 2, 3, 4]);
    assert_eq!(
        bb.read_len(Some(3)),
        Err(DecodeError::MaxLengthExceeded { len: 4, max: 3 })
    );

    let mut bb = ByteBuffer::new(&[0xff, 0xff, 0xff, 0xff]);
    assert_eq!(bb.read_len(None), Err(DecodeError::BufferUnderflow));
}

#[test]
fn read_sequence() {
    let mut bb = ByteBuffer::new(&[1, 2, 0, 0, 0, 104, 105, 0x39, 0x30]);
    assert_eq!(bb.read_bool(), Ok(true));
    assert_eq!(bb.read_string(), Ok("hi".to_owned()));
    assert_eq!(bb.read_u16(), Ok(12345));
    assert_eq!(bb.remaining(), 0);
    assert_eq!(bb.index(), 9);
}

#[cfg(test)]
fn write_once(len: usize, cb: fn(&mut ByteBufferMut) -> Result<(), EncodeError>) -> Vec<u8> {
    let mut out = vec![0u8; len];
    let mut bb = ByteBufferMut::new(&mut out);
    cb(&mut bb).unwrap();
    assert_eq!(bb.len(), len);
    out
}

#[test]
fn write_bool() {
    assert_eq!(write_once(1, |bb| bb.write_bool(false)), [0]);
    assert_eq!(write_once(1, |bb| bb.write_bool(true)), [1]);
}

#[test]
fn write_fixed_width() {
    assert_eq!(write_once(1, |bb| bb.write_u8(255)), [255]);
    assert_eq!(write_once(2, |bb| bb.write_u16(0x1234)), [0x34, 0x12]);
    assert_eq!(write_once(4, |bb| bb.write_i32(-1)), [0xff, 0xff, 0xff, 0xff]);
    assert_eq!(
        write_once(8, |bb| bb.write_u64(0x0102_0304_0506_0708)),
        [8, 7, 6, 5, 4, 3, 2, 1]
    );
    assert_eq!(write_once(4, |bb| bb.write_f32(1.0)), 1.0f32.to_bits().to_le_bytes());
}

#[test]
fn write_bytes() {
    let mut out = [0u8; 5];
    let mut bb = ByteBufferMut::new(&mut out);
    bb.write_bytes(&[1, 2, 3]).unwrap();
    bb.write_bytes(&[]).unwrap();
    bb.write_bytes(&[4, 5]).unwrap();
    assert_eq!(
        bb.write_bytes(&[6]),
        Err(EncodeError::BufferTooSmall { needed: 6, available: 5 })
    );
    assert_eq!(out, [1, 2, 3, 4, 5]);
}

#[test]
fn write_string() {
    assert_eq!(write_once(4, |bb| bb.write_string("")), [0, 0, 0, 0]);
    assert_eq!(
        write_once(8, |bb| bb.write_string("🍕")),
        [4, 0, 0, 0, 240, 159, 141, 149]
    );

    let mut out = [0u8; 8];
    let mut bb = ByteBufferMut::new(&mut out);
    assert_eq!(
        bb.write_string_max("abcd", Some(3)),
        Err(EncodeError::MaxLengthExceeded { len: 4, max: 3 })
    );
    assert!(bb.is_empty());
}

#[test]
fn check_len_limits() {
    assert_eq!(check_len(3, Some(3)), Ok(()));
    assert_eq!(check_len(u32::MAX as usize, None), Ok(()));
    if usize::BITS > 32 {
        let too_long = u32::MAX as usize + 1;
        assert_eq!(check_len(too_long, None), Err(EncodeError::LengthOverflow(too_long)));
    }
}
