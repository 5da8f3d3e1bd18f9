//! Size synthesis: derives, once per schema, a routine that predicts exactly
//! how many bytes the encode routine writes for a value.

use tracing::trace;

use crate::{
    schema::{Primitive, TypeSchema},
    value::Value,
};

/// Bytes taken by every length prefix.
pub const LEN_PREFIX: usize = 4;

pub type SizeRoutine = Box<dyn Fn(&Value) -> usize + Send + Sync>;

/// A synthesized size computation. `Static` sizes are known from the schema
/// alone; `Dynamic` ones depend on the value.
pub enum Size {
    Static(usize),
    Dynamic(SizeRoutine),
}

impl Size {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Size::Dynamic(_))
    }

    pub fn static_size(&self) -> Option<usize> {
        match *self {
            Size::Static(n) => Some(n),
            Size::Dynamic(_) => None,
        }
    }

    /// Encoded size of `value`. Pure; a value that does not conform to the
    /// schema yields an unspecified count (the encoder reports the mismatch).
    pub fn of(&self, value: &Value) -> usize {
        match self {
            Size::Static(n) => *n,
            Size::Dynamic(f) => f(value),
        }
    }
}

fn dynamic<F>(f: F) -> Size
where
    F: Fn(&Value) -> usize + Send + Sync + 'static,
{
    Size::Dynamic(Box::new(f))
}

/// Derives the size routine for `schema`.
pub fn synthesize_size(schema: &TypeSchema) -> Size {
    let size = match schema {
        TypeSchema::Primitive { primitive: Primitive::String } => {
            dynamic(|v| LEN_PREFIX + v.as_str().len())
        }
        TypeSchema::Primitive { primitive } => Size::Static(primitive.width().unwrap_or(0)),

        TypeSchema::FixedArray { elem, length } if elem.is_byte() => Size::Static(*length),
        TypeSchema::FixedArray { elem, length } => match synthesize_size(elem) {
            Size::Static(n) => Size::Static(length * n),
            elem => dynamic(move |v| v.as_array().iter().map(|x| elem.of(x)).sum()),
        },

        TypeSchema::List { elem } if elem.is_byte() => dynamic(|v| LEN_PREFIX + v.as_bytes().len()),
        TypeSchema::List { elem } => match synthesize_size(elem) {
            Size::Static(n) => dynamic(move |v| LEN_PREFIX + v.len() * n),
            elem => dynamic(move |v| LEN_PREFIX + v.as_array().iter().map(|x| elem.of(x)).sum::<usize>()),
        },

        TypeSchema::Map { key, value } => {
            match (synthesize_size(key), synthesize_size(value)) {
                (Size::Static(k), Size::Static(e)) => dynamic(move |v| LEN_PREFIX + v.len() * (k + e)),
                (key, value) => dynamic(move |v| {
                    LEN_PREFIX
                        + v.as_map()
                            .iter()
                            .map(|(k, e)| key.of(k) + value.of(e))
                            .sum::<usize>()
                }),
            }
        }

        TypeSchema::Composite(c) => {
            let fields: Vec<(usize, Size, bool)> = c
                .fields
                .iter()
                .enumerate()
                .filter(|(_, f)| f.is_encoded())
                .map(|(i, f)| (i, synthesize_size(&f.type_), f.options.omit_empty))
                .collect();

            if fields.iter().all(|(_, size, _)| !size.is_dynamic()) {
                Size::Static(fields.iter().filter_map(|(_, size, _)| size.static_size()).sum())
            } else {
                dynamic(move |v| {
                    fields
                        .iter()
                        .map(|(i, size, omit_empty)| match v.field(*i) {
                            // omitempty
                            Some(fv) if *omit_empty && fv.is_empty_collection() => 0,
                            Some(fv) => size.of(fv),
                            None => 0,
                        })
                        .sum()
                })
            }
        }
    };

    trace!(%schema, dynamic = size.is_dynamic(), "synthesized size");
    size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::FieldOptions;
    use crate::schema::Field;

    fn p(primitive: Primitive) -> TypeSchema {
        TypeSchema::primitive(primitive)
    }

    #[test]
    fn primitive_sizes() {
        let expected = [1, 1, 2, 4, 8, 1, 2, 4, 8, 4, 8];
        for (prim, n) in Primitive::ALL[..11].iter().zip(expected) {
            assert_eq!(synthesize_size(&p(*prim)).static_size(), Some(n), "{:?}", prim);
        }
        let s = synthesize_size(&p(Primitive::String));
        assert!(s.is_dynamic());
        assert_eq!(s.of(&Value::String("abc".to_owned())), 7);
    }

    #[test]
    fn static_arrays_multiply() {
        let hash = TypeSchema::fixed_array(p(Primitive::Uint8), 20);
        assert_eq!(synthesize_size(&hash).static_size(), Some(20));

        let ints = TypeSchema::fixed_array(p(Primitive::Int64), 10);
        assert_eq!(synthesize_size(&ints).static_size(), Some(80));

        let nested = TypeSchema::fixed_array(TypeSchema::fixed_array(p(Primitive::Int16), 3), 2);
        assert_eq!(synthesize_size(&nested).static_size(), Some(12));
    }

    #[test]
    fn dynamic_array_sums_elements() {
        let strings = synthesize_size(&TypeSchema::fixed_array(p(Primitive::String), 2));
        assert!(strings.is_dynamic());
        let v = Value::Array(vec![Value::String("a".to_owned()), Value::String("bcd".to_owned())]);
        assert_eq!(strings.of(&v), 4 + 1 + 4 + 3);
    }

    #[test]
    fn lists() {
        let bytes = synthesize_size(&TypeSchema::list(p(Primitive::Uint8)));
        assert_eq!(bytes.of(&Value::Bytes(vec![1, 2, 3])), 7);

        let ints = synthesize_size(&TypeSchema::list(p(Primitive::Uint32)));
        assert!(ints.is_dynamic());
        assert_eq!(ints.of(&Value::Array(vec![Value::UInt32(1), Value::UInt32(2)])), 12);
        assert_eq!(ints.of(&Value::Array(vec![])), 4);

        let strings = synthesize_size(&TypeSchema::list(p(Primitive::String)));
        let v = Value::Array(vec![Value::String("xy".to_owned())]);
        assert_eq!(strings.of(&v), 4 + 4 + 2);
    }

    #[test]
    fn maps() {
        let fixed = synthesize_size(&TypeSchema::map(p(Primitive::Int32), p(Primitive::Uint64)));
        let v = Value::Map(vec![
            (Value::Int32(1), Value::UInt64(1)),
            (Value::Int32(2), Value::UInt64(2)),
        ]);
        assert_eq!(fixed.of(&v), 4 + 2 * 12);

        let dynamic_key = synthesize_size(&TypeSchema::map(p(Primitive::String), p(Primitive::Uint16)));
        let v = Value::Map(vec![(Value::String("key".to_owned()), Value::UInt16(7))]);
        assert_eq!(dynamic_key.of(&v), 4 + 7 + 2);
    }

    #[test]
    fn composite_static_and_omit_empty() {
        let fixed = TypeSchema::composite("StaticStruct", vec![
            Field::new("A", p(Primitive::Uint8)),
            Field::new("B", p(Primitive::Int32)),
            Field::new("Hash", TypeSchema::fixed_array(p(Primitive::Uint8), 20)),
            Field::new("skipped", p(Primitive::Uint64)).unexported(),
            Field::new("Ignored", p(Primitive::Uint64)).with_options(FieldOptions::ignore()),
        ]);
        assert_eq!(synthesize_size(&fixed).static_size(), Some(25));

        let omit = TypeSchema::composite("OmitEmptyStruct", vec![
            Field::new("Foo", p(Primitive::String)),
            Field::new("Extra", TypeSchema::list(p(Primitive::Uint8)))
                .with_options(FieldOptions::omit_empty()),
        ]);
        let size = synthesize_size(&omit);
        let empty = Value::Object(vec![Value::String("ab".to_owned()), Value::Bytes(vec![])]);
        let full = Value::Object(vec![Value::String("ab".to_owned()), Value::Bytes(vec![9, 9])]);
        assert_eq!(size.of(&empty), 6);
        assert_eq!(size.of(&full), 6 + 6);
        assert_eq!(size.of(&full), size.of(&full));
    }
}
