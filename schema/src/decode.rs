//! Decode synthesis. Decoding writes into an existing [Value]: slots of the
//! wrong shape are reset to the schema's zero value first, and composite
//! slots no routine owns (unexported or ignored fields) are left alone.

use std::collections::HashSet;

use tracing::trace;

use crate::{
    bb::ByteBuffer,
    error::DecodeError,
    schema::{Primitive, TypeSchema},
    value::Value,
};

pub type DecodeRoutine = Box<dyn Fn(&mut ByteBuffer, &mut Value) -> Result<(), DecodeError> + Send + Sync>;

fn routine<F>(f: F) -> DecodeRoutine
where
    F: Fn(&mut ByteBuffer, &mut Value) -> Result<(), DecodeError> + Send + Sync + 'static,
{
    Box::new(f)
}

macro_rules! decode_primitive {
    ($variant:ident, $read:ident) => {
        routine(|bb, v| {
            *v = Value::$variant(bb.$read()?);
            Ok(())
        })
    };
}

/// Derives the decode routine for `schema`. The schema is assumed verified.
pub fn synthesize_decode(schema: &TypeSchema) -> DecodeRoutine {
    decode_type(schema, None)
}

fn decode_type(schema: &TypeSchema, max_length: Option<u64>) -> DecodeRoutine {
    let decode = match schema {
        TypeSchema::Primitive { primitive } => decode_primitive(*primitive, max_length),

        TypeSchema::FixedArray { elem, length } if elem.is_byte() => {
            let length = *length;
            routine(move |bb, v| {
                let bytes = bb.read_bytes(length)?;
                if let Value::Bytes(dst) = v {
                    if dst.len() == length {
                        dst.copy_from_slice(bytes);
                        return Ok(());
                    }
                }
                *v = Value::Bytes(bytes.to_vec());
                Ok(())
            })
        }
        TypeSchema::FixedArray { elem: elem_schema, length } => {
            let length = *length;
            let zero = Value::zero(schema);
            let elem = decode_type(elem_schema, None);
            routine(move |bb, v| {
                if !matches!(v, Value::Array(items) if items.len() == length) {
                    *v = zero.clone();
                }
                if let Value::Array(items) = v {
                    for item in items.iter_mut() {
                        elem(bb, item)?;
                    }
                }
                Ok(())
            })
        }

        TypeSchema::List { elem } if elem.is_byte() => routine(move |bb, v| {
            let len = bb.read_len(max_length)?;
            *v = Value::Bytes(bb.read_bytes(len)?.to_vec());
            Ok(())
        }),
        TypeSchema::List { elem: elem_schema } => {
            let elem_zero = Value::zero(elem_schema);
            let elem = decode_type(elem_schema, None);
            routine(move |bb, v| {
                let len = bb.read_len(max_length)?;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    let mut item = elem_zero.clone();
                    elem(bb, &mut item)?;
                    items.push(item);
                }
                *v = Value::Array(items);
                Ok(())
            })
        }

        TypeSchema::Map { key: key_schema, value: value_schema } => {
            let key_zero = Value::zero(key_schema);
            let value_zero = Value::zero(value_schema);
            let key = decode_type(key_schema, None);
            let value = decode_type(value_schema, None);
            routine(move |bb, v| {
                let len = bb.read_len(max_length)?;
                let mut entries = Vec::with_capacity(len);
                // keys are compared by their encoded bytes
                let mut seen = HashSet::with_capacity(len);
                for _ in 0..len {
                    let start = bb.index();
                    let mut k = key_zero.clone();
                    key(bb, &mut k)?;
                    if !seen.insert(&bb.data()[start..bb.index()]) {
                        return Err(DecodeError::MapDuplicateKey);
                    }
                    let mut e = value_zero.clone();
                    value(bb, &mut e)?;
                    entries.push((k, e));
                }
                *v = Value::Map(entries);
                Ok(())
            })
        }

        TypeSchema::Composite(c) => {
            let zero = Value::zero(schema);
            let slots = c.fields.len();
            let fields: Vec<(usize, DecodeRoutine, Option<Value>)> = c
                .fields
                .iter()
                .enumerate()
                .filter(|(_, f)| f.is_encoded())
                .map(|(i, f)| {
                    let decode = decode_type(&f.type_, f.options.max_length);
                    let omit_empty = f.options.omit_empty.then(|| Value::zero(&f.type_));
                    (i, decode, omit_empty)
                })
                .collect();

            routine(move |bb, v| {
                if !matches!(v, Value::Object(fs) if fs.len() == slots) {
                    *v = zero.clone();
                }
                let Value::Object(fs) = v else {
                    return Ok(());
                };
                for (i, decode, omit_empty) in &fields {
                    // omitempty
                    if let Some(empty) = omit_empty {
                        if bb.remaining() == 0 {
                            fs[*i] = empty.clone();
                            return Ok(());
                        }
                    }
                    decode(bb, &mut fs[*i])?;
                }
                Ok(())
            })
        }
    };

    trace!(%schema, ?max_length, "synthesized decode");
    decode
}

fn decode_primitive(primitive: Primitive, max_length: Option<u64>) -> DecodeRoutine {
    match primitive {
        Primitive::Bool => decode_primitive!(Bool, read_bool),
        Primitive::Int8 => decode_primitive!(Int8, read_i8),
        Primitive::Int16 => decode_primitive!(Int16, read_i16),
        Primitive::Int32 => decode_primitive!(Int32, read_i32),
        Primitive::Int64 => decode_primitive!(Int64, read_i64),
        Primitive::Uint8 => decode_primitive!(UInt8, read_u8),
        Primitive::Uint16 => decode_primitive!(UInt16, read_u16),
        Primitive::Uint32 => decode_primitive!(UInt32, read_u32),
        Primitive::Uint64 => decode_primitive!(UInt64, read_u64),
        Primitive::Float32 => decode_primitive!(Float32, read_f32),
        Primitive::Float64 => decode_primitive!(Float64, read_f64),
        Primitive::String => routine(move |bb, v| {
            *v = Value::String(bb.read_string_max(max_length)?);
            Ok(())
        }),
    }
}
