// Code generated by wirecast. DO NOT EDIT.

use std::collections::HashMap;
use wirecast::{ByteBuffer, ByteBufferMut, DecodeError, EncodeError, Encoded};

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: String,
    pub weight: f32,
}

impl Default for Entry {
    fn default() -> Self {
        Entry {
            key: String::new(),
            weight: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Demo {
    pub version: u16,
    pub id: [u8; 4],
    pub flags: [bool; 2],
    pub entries: Vec<Entry>,
    pub index: HashMap<i32, String>,
    cache: u64,
    pub payload: Vec<u8>,
}

impl Default for Demo {
    fn default() -> Self {
        Demo {
            version: 0,
            id: [0u8; 4],
            flags: std::array::from_fn(|_| false),
            entries: Vec::new(),
            index: HashMap::new(),
            cache: 0,
            payload: Vec::new(),
        }
    }
}

#[allow(unused_mut, unused_variables, unused_assignments)]
impl Encoded for Demo {
    fn size_of(&self) -> usize {
        let mut n = 0usize;
        // Version
        n += 2;
        // Id
        n += 4;
        // Flags
        n += 2;
        // Entries
        n += 4;
        for x0 in self.entries.iter() {
            // Key
            n += 4 + x0.key.len();
            // Weight
            n += 4;
        }
        // Index
        n += 4;
        for (k0, v0) in self.index.iter() {
            n += 4;
            n += 4 + v0.len();
        }
        // Payload
        if !self.payload.is_empty() {
            n += 4 + self.payload.len();
        }
        n
    }

    fn encode_into(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        let needed = self.size_of();
        if buf.len() < needed {
            return Err(EncodeError::BufferTooSmall { needed, available: buf.len() });
        }
        let mut bb = ByteBufferMut::new(buf);
        // Version
        bb.write_u16(self.version)?;
        // Id
        bb.write_bytes(&self.id)?;
        // Flags
        for x0 in self.flags.iter() {
            bb.write_bool(*x0)?;
        }
        // Entries
        bb.write_len(self.entries.len(), Some(8))?;
        for x0 in self.entries.iter() {
            // Key
            bb.write_string_max(&x0.key, None)?;
            // Weight
            bb.write_f32(x0.weight)?;
        }
        // Index
        bb.write_len(self.index.len(), None)?;
        for (k0, v0) in self.index.iter() {
            bb.write_i32(*k0)?;
            bb.write_string_max(v0, None)?;
        }
        // Payload
        if !self.payload.is_empty() {
            bb.write_len(self.payload.len(), None)?;
            bb.write_bytes(&self.payload)?;
        }
        Ok(bb.len())
    }

    fn decode_prefix(buf: &[u8], obj: &mut Self) -> Result<usize, DecodeError> {
        let mut bb = ByteBuffer::new(buf);
        // Version
        obj.version = bb.read_u16()?;
        // Id
        obj.id.copy_from_slice(bb.read_bytes(4)?);
        // Flags
        for x0 in obj.flags.iter_mut() {
            *x0 = bb.read_bool()?;
        }
        // Entries
        {
            let len0 = bb.read_len(Some(8))?;
            let mut items0 = Vec::with_capacity(len0);
            for _ in 0..len0 {
                let mut x0: Entry = Entry::default();
                // Key
                x0.key = bb.read_string_max(None)?;
                // Weight
                x0.weight = bb.read_f32()?;
                items0.push(x0);
            }
            obj.entries = items0;
        }
        // Index
        {
            let len0 = bb.read_len(None)?;
            let mut entries0 = HashMap::with_capacity(len0);
            for _ in 0..len0 {
                let mut k0: i32 = 0;
                k0 = bb.read_i32()?;
                if entries0.contains_key(&k0) {
                    return Err(DecodeError::MapDuplicateKey);
                }
                let mut v0: String = String::new();
                v0 = bb.read_string_max(None)?;
                entries0.insert(k0, v0);
            }
            obj.index = entries0;
        }
        // Payload
        if bb.remaining() == 0 {
            obj.payload = Vec::new();
        } else {
            {
                let len0 = bb.read_len(None)?;
                obj.payload = bb.read_bytes(len0)?.to_vec();
            }
        }
        Ok(bb.index())
    }
}
