//! Encode synthesis. The routine built for a schema writes exactly as many
//! bytes as the matching size routine predicts.

use std::collections::HashSet;

use tracing::trace;

use crate::{
    bb::ByteBufferMut,
    error::EncodeError,
    schema::{Primitive, TypeSchema},
    value::Value,
};

pub type EncodeRoutine = Box<dyn Fn(&Value, &mut ByteBufferMut) -> Result<(), EncodeError> + Send + Sync>;

fn routine<F>(f: F) -> EncodeRoutine
where
    F: Fn(&Value, &mut ByteBufferMut) -> Result<(), EncodeError> + Send + Sync + 'static,
{
    Box::new(f)
}

fn mismatch(expected: &'static str, found: &Value) -> EncodeError {
    EncodeError::Mismatch { expected, found: found.kind() }
}

macro_rules! encode_primitive {
    ($variant:ident, $write:ident, $name:expr) => {
        routine(|v, bb| match *v {
            Value::$variant(x) => bb.$write(x),
            ref other => Err(mismatch($name, other)),
        })
    };
}

/// Derives the encode routine for `schema`. The schema is assumed verified.
pub fn synthesize_encode(schema: &TypeSchema) -> EncodeRoutine {
    encode_type(schema, None)
}

fn encode_type(schema: &TypeSchema, max_length: Option<u64>) -> EncodeRoutine {
    let encode = match schema {
        TypeSchema::Primitive { primitive } => encode_primitive(*primitive, max_length),

        TypeSchema::FixedArray { elem, length } if elem.is_byte() => {
            let length = *length;
            routine(move |v, bb| match v {
                Value::Bytes(b) if b.len() == length => bb.write_bytes(b),
                Value::Bytes(b) => Err(EncodeError::ArrayLength { expected: length, found: b.len() }),
                other => Err(mismatch("bytes", other)),
            })
        }
        TypeSchema::FixedArray { elem, length } => {
            let length = *length;
            let elem = encode_type(elem, None);
            routine(move |v, bb| match v {
                Value::Array(items) if items.len() == length => {
                    for item in items {
                        elem(item, bb)?;
                    }
                    Ok(())
                }
                Value::Array(items) => Err(EncodeError::ArrayLength { expected: length, found: items.len() }),
                other => Err(mismatch("array", other)),
            })
        }

        TypeSchema::List { elem } if elem.is_byte() => routine(move |v, bb| match v {
            Value::Bytes(b) => {
                bb.write_len(b.len(), max_length)?;
                bb.write_bytes(b)
            }
            other => Err(mismatch("bytes", other)),
        }),
        TypeSchema::List { elem } => {
            let elem = encode_type(elem, None);
            routine(move |v, bb| match v {
                Value::Array(items) => {
                    bb.write_len(items.len(), max_length)?;
                    for item in items {
                        elem(item, bb)?;
                    }
                    Ok(())
                }
                other => Err(mismatch("array", other)),
            })
        }

        TypeSchema::Map { key, value } => {
            let key = encode_type(key, None);
            let value = encode_type(value, None);
            routine(move |v, bb| match v {
                Value::Map(entries) => {
                    bb.write_len(entries.len(), max_length)?;
                    let mut spans = Vec::with_capacity(entries.len());
                    for (k, e) in entries {
                        let start = bb.len();
                        key(k, bb)?;
                        spans.push((start, bb.len()));
                        value(e, bb)?;
                    }
                    // keys are compared by their encoded bytes, as on decode
                    let written = bb.written();
                    let mut seen = HashSet::with_capacity(spans.len());
                    if !spans.iter().all(|&(start, end)| seen.insert(&written[start..end])) {
                        return Err(EncodeError::MapDuplicateKey);
                    }
                    Ok(())
                }
                other => Err(mismatch("map", other)),
            })
        }

        TypeSchema::Composite(c) => {
            let fields: Vec<(usize, String, EncodeRoutine, bool)> = c
                .fields
                .iter()
                .enumerate()
                .filter(|(_, f)| f.is_encoded())
                .map(|(i, f)| {
                    let encode = encode_type(&f.type_, f.options.max_length);
                    (i, f.name.clone(), encode, f.options.omit_empty)
                })
                .collect();

            routine(move |v, bb| {
                let slots = match v {
                    Value::Object(slots) => slots,
                    other => return Err(mismatch("object", other)),
                };
                for (i, name, encode, omit_empty) in &fields {
                    let fv = slots.get(*i).ok_or_else(|| EncodeError::MissingField(name.clone()))?;
                    // omitempty
                    if *omit_empty && fv.is_empty_collection() {
                        continue;
                    }
                    encode(fv, bb)?;
                }
                Ok(())
            })
        }
    };

    trace!(%schema, ?max_length, "synthesized encode");
    encode
}

fn encode_primitive(primitive: Primitive, max_length: Option<u64>) -> EncodeRoutine {
    match primitive {
        Primitive::Bool => encode_primitive!(Bool, write_bool, "bool"),
        Primitive::Int8 => encode_primitive!(Int8, write_i8, "int8"),
        Primitive::Int16 => encode_primitive!(Int16, write_i16, "int16"),
        Primitive::Int32 => encode_primitive!(Int32, write_i32, "int32"),
        Primitive::Int64 => encode_primitive!(Int64, write_i64, "int64"),
        Primitive::Uint8 => encode_primitive!(UInt8, write_u8, "uint8"),
        Primitive::Uint16 => encode_primitive!(UInt16, write_u16, "uint16"),
        Primitive::Uint32 => encode_primitive!(UInt32, write_u32, "uint32"),
        Primitive::Uint64 => encode_primitive!(UInt64, write_u64, "uint64"),
        Primitive::Float32 => encode_primitive!(Float32, write_f32, "float32"),
        Primitive::Float64 => encode_primitive!(Float64, write_f64, "float64"),
        Primitive::String => routine(move |v, bb| match v {
            Value::String(s) => bb.write_string_max(s, max_length),
            other => Err(mismatch("string", other)),
        }),
    }
}
