use serde::Serialize;
use std::fmt;

use crate::options::FieldOptions;

/// The fixed-width kinds plus `string`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    String,
}

impl Primitive {
    pub const ALL: [Primitive; 12] = [
        Primitive::Bool,
        Primitive::Int8,
        Primitive::Int16,
        Primitive::Int32,
        Primitive::Int64,
        Primitive::Uint8,
        Primitive::Uint16,
        Primitive::Uint32,
        Primitive::Uint64,
        Primitive::Float32,
        Primitive::Float64,
        Primitive::String,
    ];

    /// Name used in declarations and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Int8 => "int8",
            Primitive::Int16 => "int16",
            Primitive::Int32 => "int32",
            Primitive::Int64 => "int64",
            Primitive::Uint8 => "uint8",
            Primitive::Uint16 => "uint16",
            Primitive::Uint32 => "uint32",
            Primitive::Uint64 => "uint64",
            Primitive::Float32 => "float32",
            Primitive::Float64 => "float64",
            Primitive::String => "string",
        }
    }

    pub fn from_name(name: &str) -> Option<Primitive> {
        if name == "byte" {
            return Some(Primitive::Uint8);
        }
        Primitive::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// Encoded width in bytes, or `None` for `string`.
    pub fn width(self) -> Option<usize> {
        match self {
            Primitive::Bool | Primitive::Int8 | Primitive::Uint8 => Some(1),
            Primitive::Int16 | Primitive::Uint16 => Some(2),
            Primitive::Int32 | Primitive::Uint32 | Primitive::Float32 => Some(4),
            Primitive::Int64 | Primitive::Uint64 | Primitive::Float64 => Some(8),
            Primitive::String => None,
        }
    }
}

/// Description of a type to be encoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeSchema {
    Primitive { primitive: Primitive },
    FixedArray { elem: Box<TypeSchema>, length: usize },
    List { elem: Box<TypeSchema> },
    Map { key: Box<TypeSchema>, value: Box<TypeSchema> },
    Composite(Composite),
}

/// A struct-like record. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composite {
    pub name:   String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name:     String,
    #[serde(rename = "type")]
    pub type_:    TypeSchema,
    pub options:  FieldOptions,
    pub exported: bool,
}

impl Field {
    /// An exported field with no options.
    pub fn new(name: &str, type_: TypeSchema) -> Field {
        Field {
            name: name.to_owned(),
            type_,
            options: FieldOptions::default(),
            exported: true,
        }
    }

    pub fn with_options(mut self, options: FieldOptions) -> Field {
        self.options = options;
        self
    }

    pub fn unexported(mut self) -> Field {
        self.exported = false;
        self
    }

    /// Whether any synthesizer sees this field.
    pub fn is_encoded(&self) -> bool {
        self.exported && !self.options.ignore
    }
}

impl TypeSchema {
    pub fn primitive(primitive: Primitive) -> TypeSchema {
        TypeSchema::Primitive { primitive }
    }

    pub fn fixed_array(elem: TypeSchema, length: usize) -> TypeSchema {
        TypeSchema::FixedArray { elem: Box::new(elem), length }
    }

    pub fn list(elem: TypeSchema) -> TypeSchema {
        TypeSchema::List { elem: Box::new(elem) }
    }

    pub fn map(key: TypeSchema, value: TypeSchema) -> TypeSchema {
        TypeSchema::Map { key: Box::new(key), value: Box::new(value) }
    }

    pub fn composite(name: &str, fields: Vec<Field>) -> TypeSchema {
        TypeSchema::Composite(Composite { name: name.to_owned(), fields })
    }

    /// Only `uint8` is copied verbatim inside arrays and lists.
    pub fn is_byte(&self) -> bool {
        matches!(self, TypeSchema::Primitive { primitive: Primitive::Uint8 })
    }

    /// Kinds whose size is observable through a length.
    pub fn omit_empty_is_valid(&self) -> bool {
        matches!(
            self,
            TypeSchema::Primitive { primitive: Primitive::String }
                | TypeSchema::FixedArray { .. }
                | TypeSchema::List { .. }
                | TypeSchema::Map { .. }
        )
    }

    pub fn max_len_is_valid(&self) -> bool {
        matches!(
            self,
            TypeSchema::Primitive { primitive: Primitive::String }
                | TypeSchema::List { .. }
                | TypeSchema::Map { .. }
        )
    }

    /// A composite with no exported, non-ignored field.
    pub fn is_empty_composite(&self) -> bool {
        match self {
            TypeSchema::Composite(c) => !c.fields.iter().any(Field::is_encoded),
            _ => false,
        }
    }
}

impl fmt::Display for TypeSchema {
    /// Renders the type in declaration syntax, e.g. `map[string][4]uint8`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeSchema::Primitive { primitive } => write!(f, "{}", primitive.name()),
            TypeSchema::FixedArray { elem, length } => write!(f, "[{}]{}", length, elem),
            TypeSchema::List { elem } => write!(f, "[]{}", elem),
            TypeSchema::Map { key, value } => write!(f, "map[{}]{}", key, value),
            TypeSchema::Composite(c) => write!(f, "{}", c.name),
        }
    }
}
