use tracing::trace;

use crate::{
    error::SchemaError,
    schema::{Composite, TypeSchema},
};

/// Returns `Ok(())` if `schema` can be synthesized, or the first
/// [SchemaError] found otherwise. The synthesizers assume a verified schema.
pub fn verify_schema(schema: &TypeSchema) -> Result<(), SchemaError> {
    match schema {
        TypeSchema::Composite(c) => verify_composite(c, &c.name, true),
        other => Err(SchemaError::NotComposite(other.to_string())),
    }
}

fn verify_type(schema: &TypeSchema, path: &str) -> Result<(), SchemaError> {
    match schema {
        TypeSchema::Primitive { .. } => Ok(()),
        TypeSchema::FixedArray { elem, .. } => verify_type(elem, &format!("{}[]", path)),
        TypeSchema::List { elem } => {
            if elem.is_empty_composite() {
                return Err(SchemaError::EmptyCompositeInList(path.to_owned()));
            }
            verify_type(elem, &format!("{}[]", path))
        }
        TypeSchema::Map { key, value } => {
            verify_type(key, &format!("{}<key>", path))?;
            verify_type(value, &format!("{}<value>", path))
        }
        TypeSchema::Composite(c) => verify_composite(c, path, false),
    }
}

fn verify_composite(c: &Composite, path: &str, is_top_level: bool) -> Result<(), SchemaError> {
    trace!(path, fields = c.fields.len(), is_top_level, "verifying struct");

    let last = c.fields.len().saturating_sub(1);
    for (i, field) in c.fields.iter().enumerate() {
        if !field.exported {
            continue;
        }

        let field_path = format!("{}.{}", path, field.name);
        let opts = &field.options;

        if opts.ignore {
            if opts.omit_empty || opts.max_length.is_some() {
                return Err(SchemaError::IgnoreWithOptions(field_path));
            }
            continue;
        }

        // omitempty: last field of the top-level struct, length-bearing kinds only
        if opts.omit_empty {
            if !field.type_.omit_empty_is_valid() {
                return Err(SchemaError::OmitEmptyInvalidKind(field_path));
            }
            if i != last {
                return Err(SchemaError::OmitEmptyNotLast(field_path));
            }
            if !is_top_level {
                return Err(SchemaError::OmitEmptyNotTopLevel(field_path));
            }
        }

        if opts.max_length.is_some() && !field.type_.max_len_is_valid() {
            return Err(SchemaError::MaxLengthInvalidKind(field_path));
        }

        verify_type(&field.type_, &field_path)?;
    }

    Ok(())
}
