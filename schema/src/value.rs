use crate::schema::{Primitive, TypeSchema};

use std::fmt;
use std::ops::Index;

/// This type holds dynamic wirecast data.
///
/// A Value mirrors the shape of a [TypeSchema](enum.TypeSchema.html):
/// byte arrays and byte lists are held as [Bytes](#variant.Bytes), other
/// arrays and lists as [Array](#variant.Array), maps as an ordered entry list
/// and composites as [Object](#variant.Object) with one slot per declared
/// field (including unexported and ignored ones) in declaration order.
#[derive(Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Object(Vec<Value>),
}

impl Value {
    /// The zero value of `schema`: numbers are 0, strings/lists/maps are
    /// empty, fixed arrays hold `length` zero elements.
    pub fn zero(schema: &TypeSchema) -> Value {
        match schema {
            TypeSchema::Primitive { primitive } => match primitive {
                Primitive::Bool => Value::Bool(false),
                Primitive::Int8 => Value::Int8(0),
                Primitive::Int16 => Value::Int16(0),
                Primitive::Int32 => Value::Int32(0),
                Primitive::Int64 => Value::Int64(0),
                Primitive::Uint8 => Value::UInt8(0),
                Primitive::Uint16 => Value::UInt16(0),
                Primitive::Uint32 => Value::UInt32(0),
                Primitive::Uint64 => Value::UInt64(0),
                Primitive::Float32 => Value::Float32(0.0),
                Primitive::Float64 => Value::Float64(0.0),
                Primitive::String => Value::String(String::new()),
            },
            TypeSchema::FixedArray { elem, length } if elem.is_byte() => Value::Bytes(vec![0; *length]),
            TypeSchema::FixedArray { elem, length } => Value::Array(vec![Value::zero(elem); *length]),
            TypeSchema::List { elem } if elem.is_byte() => Value::Bytes(Vec::new()),
            TypeSchema::List { .. } => Value::Array(Vec::new()),
            TypeSchema::Map { .. } => Value::Map(Vec::new()),
            TypeSchema::Composite(c) => {
                Value::Object(c.fields.iter().map(|f| Value::zero(&f.type_)).collect())
            }
        }
    }

    /// Short kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match *self {
            Value::Bool(_) => "bool",
            Value::Int8(_) => "int8",
            Value::Int16(_) => "int16",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::UInt8(_) => "uint8",
            Value::UInt16(_) => "uint16",
            Value::UInt32(_) => "uint32",
            Value::UInt64(_) => "uint64",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
        }
    }

    /// A convenience method to extract the text out of a [String](#variant.String).
    /// Returns `""` for other value kinds.
    pub fn as_str(&self) -> &str {
        match *self {
            Value::String(ref value) => value.as_str(),
            _ => "",
        }
    }

    /// A convenience method to get the bytes out of [Bytes](#variant.Bytes).
    /// Returns an empty slice for other value kinds.
    pub fn as_bytes(&self) -> &[u8] {
        match *self {
            Value::Bytes(ref value) => value.as_slice(),
            _ => &[],
        }
    }

    /// A convenience method to get an array of values out of an [Array](#variant.Array).
    /// Returns an empty array for other value kinds.
    pub fn as_array(&self) -> &[Value] {
        match *self {
            Value::Array(ref values) => values.as_slice(),
            _ => &[],
        }
    }

    /// A convenience method to get the entries out of a [Map](#variant.Map).
    /// Returns an empty slice for other value kinds.
    pub fn as_map(&self) -> &[(Value, Value)] {
        match *self {
            Value::Map(ref entries) => entries.as_slice(),
            _ => &[],
        }
    }

    /// The length a `maxlen`/`omitempty` option observes: byte length for
    /// strings, element count for bytes/arrays, entry count for maps.
    /// Returns `0` for other value kinds.
    pub fn len(&self) -> usize {
        match *self {
            Value::String(ref value) => value.len(),
            Value::Bytes(ref value) => value.len(),
            Value::Array(ref values) => values.len(),
            Value::Map(ref entries) => entries.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this is a string, bytes, array or map with nothing in it.
    /// Scalars and objects are never empty collections.
    pub fn is_empty_collection(&self) -> bool {
        match *self {
            Value::String(_) | Value::Bytes(_) | Value::Array(_) | Value::Map(_) => self.is_empty(),
            _ => false,
        }
    }

    /// A convenience method to append to an [Array](#variant.Array). Does
    /// nothing for other value kinds.
    pub fn push(&mut self, value: Value) {
        if let Value::Array(ref mut values) = *self {
            values.push(value);
        }
    }

    /// A convenience method to read slot `index` of an [Object](#variant.Object).
    pub fn field(&self, index: usize) -> Option<&Value> {
        match *self {
            Value::Object(ref fields) => fields.get(index),
            _ => None,
        }
    }

    pub fn field_mut(&mut self, index: usize) -> Option<&mut Value> {
        match *self {
            Value::Object(ref mut fields) => fields.get_mut(index),
            _ => None,
        }
    }

    /// A convenience method to update slot `index` of an
    /// [Object](#variant.Object). Does nothing for other value kinds or out of
    /// range slots.
    pub fn set(&mut self, index: usize, value: Value) {
        if let Value::Object(ref mut fields) = *self {
            if let Some(slot) = fields.get_mut(index) {
                *slot = value;
            }
        }
    }
}

impl Index<usize> for Value {
    type Output = Value;

    /// A convenience method that adds support for `self[index]` expressions
    /// on arrays and objects. It will panic if this value isn't an
    /// [Array](#variant.Array) or [Object](#variant.Object) or if the provided
    /// index is out of bounds.
    fn index(&self, index: usize) -> &Value {
        match *self {
            Value::Array(ref values) => &values[index],
            Value::Object(ref fields) => &fields[index],
            _ => panic!("cannot index into {}", self.kind()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match *self {
            Value::Bool(value) => fmt::Debug::fmt(&value, f),
            Value::Int8(value) => fmt::Debug::fmt(&value, f),
            Value::Int16(value) => fmt::Debug::fmt(&value, f),
            Value::Int32(value) => fmt::Debug::fmt(&value, f),
            Value::Int64(value) => fmt::Debug::fmt(&value, f),
            Value::UInt8(value) => fmt::Debug::fmt(&value, f),
            Value::UInt16(value) => fmt::Debug::fmt(&value, f),
            Value::UInt32(value) => fmt::Debug::fmt(&value, f),
            Value::UInt64(value) => fmt::Debug::fmt(&value, f),
            Value::Float32(value) => fmt::Debug::fmt(&value, f),
            Value::Float64(value) => fmt::Debug::fmt(&value, f),
            Value::String(ref value) => fmt::Debug::fmt(value, f),
            Value::Bytes(ref value) => {
                f.write_str("0x")?;
                for b in value {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            Value::Array(ref values) => f.debug_list().entries(values).finish(),
            Value::Map(ref entries) => f
                .debug_map()
                .entries(entries.iter().map(|(k, v)| (k, v)))
                .finish(),
            Value::Object(ref fields) => {
                f.write_str("{")?;
                for (i, value) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}", value)?;
                }
                f.write_str("}")
            }
        }
    }
}
