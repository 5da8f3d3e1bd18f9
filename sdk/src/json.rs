//! Conversion between [Value] trees and JSON.
//!
//! Structs become objects keyed by field name (only fields that reach the
//! wire), byte arrays and lists become arrays of numbers, maps with string
//! keys become objects and other maps become arrays of `[key, value]` pairs.
//! Non-finite floats are written as `null`.

use serde_json::{Map as JsonMap, Number, Value as Json};
use thiserror::Error;
use wirecast_schema::{Primitive, TypeSchema, Value};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonError {
    #[error("{path}: expected {expected}")]
    Expected { path: String, expected: &'static str },

    #[error("{path}: number out of range for {kind}")]
    OutOfRange { path: String, kind: &'static str },

    #[error("{path}: expected {expected} elements, found {found}")]
    ArrayLength { path: String, expected: usize, found: usize },

    #[error("{path}: unknown field {name:?}")]
    UnknownField { path: String, name: String },
}

fn expected(path: &str, expected: &'static str) -> JsonError {
    JsonError::Expected { path: path.to_owned(), expected }
}

fn float_to_json(f: f64) -> Json {
    Number::from_f64(f).map(Json::Number).unwrap_or(Json::Null)
}

/// Renders `value` as JSON following the shape of `schema`. Parts of the
/// value that do not match the schema are rendered as `null`.
pub fn to_json(schema: &TypeSchema, value: &Value) -> Json {
    match (schema, value) {
        (TypeSchema::Primitive { .. }, Value::Bool(b)) => Json::Bool(*b),
        (TypeSchema::Primitive { .. }, Value::Int8(n)) => Json::from(*n),
        (TypeSchema::Primitive { .. }, Value::Int16(n)) => Json::from(*n),
        (TypeSchema::Primitive { .. }, Value::Int32(n)) => Json::from(*n),
        (TypeSchema::Primitive { .. }, Value::Int64(n)) => Json::from(*n),
        (TypeSchema::Primitive { .. }, Value::UInt8(n)) => Json::from(*n),
        (TypeSchema::Primitive { .. }, Value::UInt16(n)) => Json::from(*n),
        (TypeSchema::Primitive { .. }, Value::UInt32(n)) => Json::from(*n),
        (TypeSchema::Primitive { .. }, Value::UInt64(n)) => Json::from(*n),
        (TypeSchema::Primitive { .. }, Value::Float32(f)) => float_to_json(*f as f64),
        (TypeSchema::Primitive { .. }, Value::Float64(f)) => float_to_json(*f),
        (TypeSchema::Primitive { .. }, Value::String(s)) => Json::String(s.clone()),
        (TypeSchema::FixedArray { .. } | TypeSchema::List { .. }, Value::Bytes(bytes)) => {
            Json::Array(bytes.iter().map(|b| Json::from(*b)).collect())
        }
        (TypeSchema::FixedArray { elem, .. } | TypeSchema::List { elem }, Value::Array(values)) => {
            Json::Array(values.iter().map(|v| to_json(elem, v)).collect())
        }
        (TypeSchema::Map { key, value: value_schema }, Value::Map(entries)) => {
            if matches!(**key, TypeSchema::Primitive { primitive: Primitive::String }) {
                let mut object = JsonMap::new();
                for (k, v) in entries {
                    object.insert(k.as_str().to_owned(), to_json(value_schema, v));
                }
                Json::Object(object)
            } else {
                Json::Array(
                    entries
                        .iter()
                        .map(|(k, v)| Json::Array(vec![to_json(key, k), to_json(value_schema, v)]))
                        .collect(),
                )
            }
        }
        (TypeSchema::Composite(c), Value::Object(slots)) => {
            let mut object = JsonMap::new();
            for (field, slot) in c.fields.iter().zip(slots) {
                if field.is_encoded() {
                    object.insert(field.name.clone(), to_json(&field.type_, slot));
                }
            }
            Json::Object(object)
        }
        _ => Json::Null,
    }
}

fn int_from_json(path: &str, json: &Json, primitive: Primitive) -> Result<Value, JsonError> {
    let kind = primitive.name();
    let out_of_range = || JsonError::OutOfRange { path: path.to_owned(), kind };

    let value = match primitive {
        Primitive::Uint8 | Primitive::Uint16 | Primitive::Uint32 | Primitive::Uint64 => {
            let n = json.as_u64().ok_or_else(|| {
                if json.is_number() { out_of_range() } else { expected(path, "an unsigned integer") }
            })?;
            match primitive {
                Primitive::Uint8 => Value::UInt8(u8::try_from(n).map_err(|_| out_of_range())?),
                Primitive::Uint16 => Value::UInt16(u16::try_from(n).map_err(|_| out_of_range())?),
                Primitive::Uint32 => Value::UInt32(u32::try_from(n).map_err(|_| out_of_range())?),
                _ => Value::UInt64(n),
            }
        }
        _ => {
            let n = json.as_i64().ok_or_else(|| {
                if json.is_number() { out_of_range() } else { expected(path, "an integer") }
            })?;
            match primitive {
                Primitive::Int8 => Value::Int8(i8::try_from(n).map_err(|_| out_of_range())?),
                Primitive::Int16 => Value::Int16(i16::try_from(n).map_err(|_| out_of_range())?),
                Primitive::Int32 => Value::Int32(i32::try_from(n).map_err(|_| out_of_range())?),
                _ => Value::Int64(n),
            }
        }
    };
    Ok(value)
}

fn elements<'j>(path: &str, json: &'j Json, length: Option<usize>) -> Result<&'j Vec<Json>, JsonError> {
    let items = json.as_array().ok_or_else(|| expected(path, "an array"))?;
    if let Some(length) = length {
        if items.len() != length {
            return Err(JsonError::ArrayLength { path: path.to_owned(), expected: length, found: items.len() });
        }
    }
    Ok(items)
}

fn from_json_at(schema: &TypeSchema, json: &Json, path: &str) -> Result<Value, JsonError> {
    Ok(match schema {
        TypeSchema::Primitive { primitive } => match primitive {
            Primitive::Bool => Value::Bool(json.as_bool().ok_or_else(|| expected(path, "a boolean"))?),
            Primitive::Float32 | Primitive::Float64 => {
                let f = match json {
                    Json::Null => f64::NAN,
                    _ => json.as_f64().ok_or_else(|| expected(path, "a number"))?,
                };
                if *primitive == Primitive::Float32 { Value::Float32(f as f32) } else { Value::Float64(f) }
            }
            Primitive::String => Value::String(json.as_str().ok_or_else(|| expected(path, "a string"))?.to_owned()),
            _ => int_from_json(path, json, *primitive)?,
        },
        TypeSchema::FixedArray { elem, length } if elem.is_byte() => bytes_from_json(path, json, Some(*length))?,
        TypeSchema::List { elem } if elem.is_byte() => bytes_from_json(path, json, None)?,
        TypeSchema::FixedArray { elem, length } => array_from_json(elem, path, json, Some(*length))?,
        TypeSchema::List { elem } => array_from_json(elem, path, json, None)?,
        TypeSchema::Map { key, value } => {
            let mut entries = Vec::new();
            match json {
                Json::Object(object) if matches!(**key, TypeSchema::Primitive { primitive: Primitive::String }) => {
                    for (k, v) in object {
                        let entry_path = format!("{}[{:?}]", path, k);
                        entries.push((Value::String(k.clone()), from_json_at(value, v, &entry_path)?));
                    }
                }
                _ => {
                    for (i, pair) in elements(path, json, None)?.iter().enumerate() {
                        let entry_path = format!("{}[{}]", path, i);
                        let pair = elements(&entry_path, pair, Some(2))?;
                        entries.push((
                            from_json_at(key, &pair[0], &entry_path)?,
                            from_json_at(value, &pair[1], &entry_path)?,
                        ));
                    }
                }
            }
            Value::Map(entries)
        }
        TypeSchema::Composite(c) => {
            let object = json.as_object().ok_or_else(|| expected(path, "an object"))?;
            let mut slots: Vec<Value> = c.fields.iter().map(|f| Value::zero(&f.type_)).collect();
            for (name, v) in object {
                let index = c
                    .fields
                    .iter()
                    .position(|f| f.is_encoded() && &f.name == name)
                    .ok_or_else(|| JsonError::UnknownField { path: path.to_owned(), name: name.clone() })?;
                slots[index] = from_json_at(&c.fields[index].type_, v, &format!("{}.{}", path, name))?;
            }
            Value::Object(slots)
        }
    })
}

fn bytes_from_json(path: &str, json: &Json, length: Option<usize>) -> Result<Value, JsonError> {
    let mut bytes = Vec::new();
    for (i, item) in elements(path, json, length)?.iter().enumerate() {
        let item_path = format!("{}[{}]", path, i);
        let n = item.as_u64().ok_or_else(|| expected(&item_path, "a byte"))?;
        bytes.push(u8::try_from(n).map_err(|_| JsonError::OutOfRange { path: item_path, kind: "uint8" })?);
    }
    Ok(Value::Bytes(bytes))
}

fn array_from_json(elem: &TypeSchema, path: &str, json: &Json, length: Option<usize>) -> Result<Value, JsonError> {
    let values = elements(path, json, length)?
        .iter()
        .enumerate()
        .map(|(i, item)| from_json_at(elem, item, &format!("{}[{}]", path, i)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(values))
}

/// Builds a value of `schema` from JSON in the form [to_json] writes. Struct
/// fields missing from the object are left at their zero value.
pub fn from_json(schema: &TypeSchema, json: &Json) -> Result<Value, JsonError> {
    let root = match schema {
        TypeSchema::Composite(c) => c.name.as_str(),
        _ => "$",
    };
    from_json_at(schema, json, root)
}
