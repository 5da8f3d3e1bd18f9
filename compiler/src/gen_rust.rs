use std::collections::HashMap;

use tracing::debug;
use wirecast_schema::{synthesize_size, verify_schema, Composite, Primitive, TypeSchema};

use crate::error::CompileError;

/// Settings for [compile_schema_to_rust].
#[derive(Debug, Clone, PartialEq)]
pub struct GenOptions {
    /// Wrap the output in `pub mod <module> { ... }`.
    pub module:        Option<String>,
    /// Crate path the generated code imports the runtime from.
    pub runtime_crate: String,
}

impl Default for GenOptions {
    fn default() -> Self {
        GenOptions { module: None, runtime_crate: "wirecast".to_string() }
    }
}

/// Converts a string to PascalCase.
/// - If the string contains underscores, it splits on underscores and converts each word
///   so that its first letter is uppercase and the rest lowercase.
/// - If the string does not contain underscores and is fully uppercase, it converts it
///   so that only the first letter is uppercase and the rest are lowercase.
/// - Otherwise, it ensures only the first letter is uppercase.
fn to_pascal_case(s: &str) -> String {
    fn capitalize(word: &str, lower_rest: bool) -> String {
        let mut chars = word.chars();
        match chars.next() {
            None => String::new(),
            Some(first) if lower_rest => first.to_uppercase().to_string() + &chars.as_str().to_lowercase(),
            Some(first) => first.to_uppercase().to_string() + chars.as_str(),
        }
    }

    if s.contains('_') {
        s.split('_')
         .filter(|word| !word.is_empty())
         .map(|word| capitalize(word, true))
         .collect::<String>()
    } else {
        capitalize(s, s == s.to_uppercase())
    }
}

/// Converts a string to snake_case.
/// This implementation avoids inserting underscores between consecutive uppercase letters,
/// so that acronyms remain intact (e.g. "sessionID" becomes "session_id").
fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut snake = String::new();
    for i in 0..chars.len() {
        let c = chars[i];
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                // Insert an underscore if the previous character is not uppercase,
                // or if the next character exists and is lowercase.
                if !prev.is_uppercase() || (i + 1 < chars.len() && chars[i + 1].is_lowercase()) {
                    snake.push('_');
                }
            }
            snake.extend(c.to_lowercase());
        } else {
            snake.push(c);
        }
    }
    snake
}

/// Escapes Rust reserved keywords by suffixing with an underscore.
fn escape_rust_keyword(s: &str) -> String {
    let keywords = [
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else",
        "enum", "extern", "false", "fn", "for", "if", "impl",
        "in", "let", "loop", "match", "mod", "move", "mut",
        "pub", "ref", "return", "self", "Self", "static",
        "struct", "super", "trait", "true", "type", "unsafe",
        "use", "where", "while",
    ];
    if keywords.contains(&s) {
        format!("{}_", s)
    } else {
        s.to_string()
    }
}

fn field_name(name: &str) -> String {
    escape_rust_keyword(&to_snake_case(name))
}

fn struct_name(c: &Composite) -> String {
    to_pascal_case(&c.name)
}

/// Maps a schema type to the Rust type generated for it.
fn rust_type(schema: &TypeSchema) -> String {
    match schema {
        TypeSchema::Primitive { primitive } => match primitive {
            Primitive::Bool => "bool",
            Primitive::Int8 => "i8",
            Primitive::Int16 => "i16",
            Primitive::Int32 => "i32",
            Primitive::Int64 => "i64",
            Primitive::Uint8 => "u8",
            Primitive::Uint16 => "u16",
            Primitive::Uint32 => "u32",
            Primitive::Uint64 => "u64",
            Primitive::Float32 => "f32",
            Primitive::Float64 => "f64",
            Primitive::String => "String",
        }
        .to_string(),
        TypeSchema::FixedArray { elem, length } => format!("[{}; {}]", rust_type(elem), length),
        TypeSchema::List { elem } => format!("Vec<{}>", rust_type(elem)),
        TypeSchema::Map { key, value } => format!("HashMap<{}, {}>", rust_type(key), rust_type(value)),
        TypeSchema::Composite(c) => struct_name(c),
    }
}

/// Expression for the zero value of a schema type.
fn zero_expr(schema: &TypeSchema) -> String {
    match schema {
        TypeSchema::Primitive { primitive } => match primitive {
            Primitive::Bool => "false",
            Primitive::Float32 | Primitive::Float64 => "0.0",
            Primitive::String => "String::new()",
            _ => "0",
        }
        .to_string(),
        TypeSchema::FixedArray { elem, length } if elem.is_byte() => format!("[0u8; {}]", length),
        TypeSchema::FixedArray { elem, .. } => format!("std::array::from_fn(|_| {})", zero_expr(elem)),
        TypeSchema::List { .. } => "Vec::new()".to_string(),
        TypeSchema::Map { .. } => "HashMap::new()".to_string(),
        TypeSchema::Composite(c) => format!("{}::default()", struct_name(c)),
    }
}

/// Whether `Eq` and `Hash` can be derived for the type.
fn is_hashable(schema: &TypeSchema) -> bool {
    match schema {
        TypeSchema::Primitive { primitive } => !matches!(primitive, Primitive::Float32 | Primitive::Float64),
        TypeSchema::FixedArray { elem, .. } | TypeSchema::List { elem } => is_hashable(elem),
        TypeSchema::Map { .. } => false,
        TypeSchema::Composite(c) => c.fields.iter().all(|f| is_hashable(&f.type_)),
    }
}

fn max_literal(max_length: Option<u64>) -> String {
    match max_length {
        Some(max) => format!("Some({})", max),
        None => "None".to_string(),
    }
}

fn indent(level: usize) -> String {
    "    ".repeat(level)
}

/// An expression naming the value being sized, encoded or decoded. Loop
/// variables are references; struct fields and locals are places.
#[derive(Clone)]
struct Place {
    expr:   String,
    is_ref: bool,
}

impl Place {
    fn owned(expr: &str) -> Place {
        Place { expr: expr.to_string(), is_ref: false }
    }

    fn reference(expr: &str) -> Place {
        Place { expr: expr.to_string(), is_ref: true }
    }

    fn value(&self) -> String {
        if self.is_ref { format!("*{}", self.expr) } else { self.expr.clone() }
    }

    fn borrow(&self) -> String {
        if self.is_ref { self.expr.clone() } else { format!("&{}", self.expr) }
    }

    fn field(&self, name: &str) -> Place {
        Place::owned(&format!("{}.{}", self.expr, field_name(name)))
    }
}

fn primitive_suffix(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Bool => "bool",
        Primitive::Int8 => "i8",
        Primitive::Int16 => "i16",
        Primitive::Int32 => "i32",
        Primitive::Int64 => "i64",
        Primitive::Uint8 => "u8",
        Primitive::Uint16 => "u16",
        Primitive::Uint32 => "u32",
        Primitive::Uint64 => "u64",
        Primitive::Float32 => "f32",
        Primitive::Float64 => "f64",
        Primitive::String => "string",
    }
}

fn gen_size(lines: &mut Vec<String>, level: usize, schema: &TypeSchema, place: &Place, depth: usize) {
    let pad = indent(level);
    if let Some(n) = synthesize_size(schema).static_size() {
        lines.push(format!("{}n += {};", pad, n));
        return;
    }

    match schema {
        TypeSchema::Primitive { .. } => lines.push(format!("{}n += 4 + {}.len();", pad, place.expr)),
        TypeSchema::List { elem } if elem.is_byte() => lines.push(format!("{}n += 4 + {}.len();", pad, place.expr)),
        TypeSchema::FixedArray { elem, .. } => {
            let x = format!("x{}", depth);
            lines.push(format!("{}for {} in {}.iter() {{", pad, x, place.expr));
            gen_size(lines, level + 1, elem, &Place::reference(&x), depth + 1);
            lines.push(format!("{}}}", pad));
        }
        TypeSchema::List { elem } => match synthesize_size(elem).static_size() {
            Some(n) => lines.push(format!("{}n += 4 + {}.len() * {};", pad, place.expr, n)),
            None => {
                let x = format!("x{}", depth);
                lines.push(format!("{}n += 4;", pad));
                lines.push(format!("{}for {} in {}.iter() {{", pad, x, place.expr));
                gen_size(lines, level + 1, elem, &Place::reference(&x), depth + 1);
                lines.push(format!("{}}}", pad));
            }
        },
        TypeSchema::Map { key, value } => {
            match (synthesize_size(key).static_size(), synthesize_size(value).static_size()) {
                (Some(k), Some(v)) => lines.push(format!("{}n += 4 + {}.len() * {};", pad, place.expr, k + v)),
                _ => {
                    let (k, v) = (format!("k{}", depth), format!("v{}", depth));
                    lines.push(format!("{}n += 4;", pad));
                    lines.push(format!("{}for ({}, {}) in {}.iter() {{", pad, k, v, place.expr));
                    gen_size(lines, level + 1, key, &Place::reference(&k), depth + 1);
                    gen_size(lines, level + 1, value, &Place::reference(&v), depth + 1);
                    lines.push(format!("{}}}", pad));
                }
            }
        }
        TypeSchema::Composite(c) => {
            for f in c.fields.iter().filter(|f| f.is_encoded()) {
                let fp = place.field(&f.name);
                lines.push(format!("{}// {}", pad, f.name));
                if f.options.omit_empty {
                    lines.push(format!("{}if !{}.is_empty() {{", pad, fp.expr));
                    gen_size(lines, level + 1, &f.type_, &fp, depth);
                    lines.push(format!("{}}}", pad));
                } else {
                    gen_size(lines, level, &f.type_, &fp, depth);
                }
            }
        }
    }
}

fn gen_encode(
    lines: &mut Vec<String>,
    level: usize,
    schema: &TypeSchema,
    place: &Place,
    max_length: Option<u64>,
    depth: usize,
) {
    let pad = indent(level);
    let max = max_literal(max_length);

    match schema {
        TypeSchema::Primitive { primitive: Primitive::String } => {
            lines.push(format!("{}bb.write_string_max({}, {})?;", pad, place.borrow(), max));
        }
        TypeSchema::Primitive { primitive } => {
            lines.push(format!("{}bb.write_{}({})?;", pad, primitive_suffix(*primitive), place.value()));
        }
        TypeSchema::FixedArray { elem, .. } if elem.is_byte() => {
            lines.push(format!("{}bb.write_bytes({})?;", pad, place.borrow()));
        }
        TypeSchema::FixedArray { elem, .. } => {
            let x = format!("x{}", depth);
            lines.push(format!("{}for {} in {}.iter() {{", pad, x, place.expr));
            gen_encode(lines, level + 1, elem, &Place::reference(&x), None, depth + 1);
            lines.push(format!("{}}}", pad));
        }
        TypeSchema::List { elem } if elem.is_byte() => {
            lines.push(format!("{}bb.write_len({}.len(), {})?;", pad, place.expr, max));
            lines.push(format!("{}bb.write_bytes({})?;", pad, place.borrow()));
        }
        TypeSchema::List { elem } => {
            let x = format!("x{}", depth);
            lines.push(format!("{}bb.write_len({}.len(), {})?;", pad, place.expr, max));
            lines.push(format!("{}for {} in {}.iter() {{", pad, x, place.expr));
            gen_encode(lines, level + 1, elem, &Place::reference(&x), None, depth + 1);
            lines.push(format!("{}}}", pad));
        }
        TypeSchema::Map { key, value } => {
            let (k, v) = (format!("k{}", depth), format!("v{}", depth));
            lines.push(format!("{}bb.write_len({}.len(), {})?;", pad, place.expr, max));
            lines.push(format!("{}for ({}, {}) in {}.iter() {{", pad, k, v, place.expr));
            gen_encode(lines, level + 1, key, &Place::reference(&k), None, depth + 1);
            gen_encode(lines, level + 1, value, &Place::reference(&v), None, depth + 1);
            lines.push(format!("{}}}", pad));
        }
        TypeSchema::Composite(c) => {
            for f in c.fields.iter().filter(|f| f.is_encoded()) {
                let fp = place.field(&f.name);
                lines.push(format!("{}// {}", pad, f.name));
                if f.options.omit_empty {
                    lines.push(format!("{}if !{}.is_empty() {{", pad, fp.expr));
                    gen_encode(lines, level + 1, &f.type_, &fp, f.options.max_length, depth);
                    lines.push(format!("{}}}", pad));
                } else {
                    gen_encode(lines, level, &f.type_, &fp, f.options.max_length, depth);
                }
            }
        }
    }
}

fn gen_decode(
    lines: &mut Vec<String>,
    level: usize,
    schema: &TypeSchema,
    place: &Place,
    max_length: Option<u64>,
    depth: usize,
) {
    let pad = indent(level);
    let inner = indent(level + 1);
    let max = max_literal(max_length);

    match schema {
        TypeSchema::Primitive { primitive: Primitive::String } => {
            lines.push(format!("{}{} = bb.read_string_max({})?;", pad, place.value(), max));
        }
        TypeSchema::Primitive { primitive } => {
            lines.push(format!("{}{} = bb.read_{}()?;", pad, place.value(), primitive_suffix(*primitive)));
        }
        TypeSchema::FixedArray { elem, length } if elem.is_byte() => {
            lines.push(format!("{}{}.copy_from_slice(bb.read_bytes({})?);", pad, place.expr, length));
        }
        TypeSchema::FixedArray { elem, .. } => {
            let x = format!("x{}", depth);
            lines.push(format!("{}for {} in {}.iter_mut() {{", pad, x, place.expr));
            gen_decode(lines, level + 1, elem, &Place::reference(&x), None, depth + 1);
            lines.push(format!("{}}}", pad));
        }
        TypeSchema::List { elem } if elem.is_byte() => {
            lines.push(format!("{}{{", pad));
            lines.push(format!("{}let len{} = bb.read_len({})?;", inner, depth, max));
            lines.push(format!("{}{} = bb.read_bytes(len{})?.to_vec();", inner, place.value(), depth));
            lines.push(format!("{}}}", pad));
        }
        TypeSchema::List { elem } => {
            let x = format!("x{}", depth);
            lines.push(format!("{}{{", pad));
            lines.push(format!("{}let len{} = bb.read_len({})?;", inner, depth, max));
            lines.push(format!("{}let mut items{} = Vec::with_capacity(len{});", inner, depth, depth));
            lines.push(format!("{}for _ in 0..len{} {{", inner, depth));
            lines.push(format!("{}    let mut {}: {} = {};", inner, x, rust_type(elem), zero_expr(elem)));
            gen_decode(lines, level + 2, elem, &Place::owned(&x), None, depth + 1);
            lines.push(format!("{}    items{}.push({});", inner, depth, x));
            lines.push(format!("{}}}", inner));
            lines.push(format!("{}{} = items{};", inner, place.value(), depth));
            lines.push(format!("{}}}", pad));
        }
        TypeSchema::Map { key, value } => {
            let (k, v) = (format!("k{}", depth), format!("v{}", depth));
            lines.push(format!("{}{{", pad));
            lines.push(format!("{}let len{} = bb.read_len({})?;", inner, depth, max));
            lines.push(format!("{}let mut entries{} = HashMap::with_capacity(len{});", inner, depth, depth));
            lines.push(format!("{}for _ in 0..len{} {{", inner, depth));
            lines.push(format!("{}    let mut {}: {} = {};", inner, k, rust_type(key), zero_expr(key)));
            gen_decode(lines, level + 2, key, &Place::owned(&k), None, depth + 1);
            lines.push(format!("{}    if entries{}.contains_key(&{}) {{", inner, depth, k));
            lines.push(format!("{}        return Err(DecodeError::MapDuplicateKey);", inner));
            lines.push(format!("{}    }}", inner));
            lines.push(format!("{}    let mut {}: {} = {};", inner, v, rust_type(value), zero_expr(value)));
            gen_decode(lines, level + 2, value, &Place::owned(&v), None, depth + 1);
            lines.push(format!("{}    entries{}.insert({}, {});", inner, depth, k, v));
            lines.push(format!("{}}}", inner));
            lines.push(format!("{}{} = entries{};", inner, place.value(), depth));
            lines.push(format!("{}}}", pad));
        }
        TypeSchema::Composite(c) => {
            for f in c.fields.iter().filter(|f| f.is_encoded()) {
                let fp = place.field(&f.name);
                lines.push(format!("{}// {}", pad, f.name));
                if f.options.omit_empty {
                    lines.push(format!("{}if bb.remaining() == 0 {{", pad));
                    lines.push(format!("{}{} = {};", inner, fp.expr, zero_expr(&f.type_)));
                    lines.push(format!("{}}} else {{", pad));
                    gen_decode(lines, level + 1, &f.type_, &fp, f.options.max_length, depth);
                    lines.push(format!("{}}}", pad));
                } else {
                    gen_decode(lines, level, &f.type_, &fp, f.options.max_length, depth);
                }
            }
        }
    }
}

/// Collects every distinct composite under `schema`, nested ones first.
fn collect_structs<'a>(schema: &'a TypeSchema, out: &mut Vec<&'a Composite>) -> Result<(), CompileError> {
    match schema {
        TypeSchema::Primitive { .. } => {}
        TypeSchema::FixedArray { elem, .. } | TypeSchema::List { elem } => collect_structs(elem, out)?,
        TypeSchema::Map { key, value } => {
            if !is_hashable(key) {
                return Err(CompileError::CodegenError(format!(
                    "map key type {} cannot be hashed (contains a float or a map)",
                    key
                )));
            }
            collect_structs(key, out)?;
            collect_structs(value, out)?;
        }
        TypeSchema::Composite(c) => {
            for f in &c.fields {
                collect_structs(&f.type_, out)?;
            }
            match out.iter().find(|seen| struct_name(seen) == struct_name(c)) {
                Some(seen) if *seen == c => {}
                Some(_) => {
                    return Err(CompileError::CodegenError(format!(
                        "conflicting definitions for struct {}",
                        struct_name(c)
                    )))
                }
                None => out.push(c),
            }
        }
    }
    Ok(())
}

fn uses_hash_map(schema: &TypeSchema) -> bool {
    match schema {
        TypeSchema::Primitive { .. } => false,
        TypeSchema::FixedArray { elem, .. } | TypeSchema::List { elem } => uses_hash_map(elem),
        TypeSchema::Map { .. } => true,
        TypeSchema::Composite(c) => c.fields.iter().any(|f| uses_hash_map(&f.type_)),
    }
}

/// Generates a struct definition plus its `Default` impl. Fixed arrays may be
/// longer than 32, so `Default` is written out instead of derived.
fn generate_struct(c: &Composite) -> Result<String, CompileError> {
    let name = struct_name(c);
    let mut fields = Vec::new();
    let mut defaults = Vec::new();
    let mut seen: HashMap<String, &str> = HashMap::new();

    for f in &c.fields {
        let rust_field_name = field_name(&f.name);
        if let Some(other) = seen.insert(rust_field_name.clone(), &f.name) {
            return Err(CompileError::CodegenError(format!(
                "fields {} and {} of {} both map to {}",
                other, f.name, c.name, rust_field_name
            )));
        }

        let mut field_line = String::new();
        if f.exported && f.options.ignore {
            field_line.push_str("    // not encoded\n");
        }
        let visibility = if f.exported { "pub " } else { "" };
        field_line.push_str(&format!("    {}{}: {},", visibility, rust_field_name, rust_type(&f.type_)));
        fields.push(field_line);
        defaults.push(format!("            {}: {},", rust_field_name, zero_expr(&f.type_)));
    }

    let derived = if c.fields.iter().all(|f| is_hashable(&f.type_)) {
        "#[derive(Debug, Clone, PartialEq, Eq, Hash)]"
    } else {
        "#[derive(Debug, Clone, PartialEq)]"
    };

    let mut lines = Vec::new();
    lines.push(derived.to_string());
    lines.push(format!("pub struct {} {{", name));
    lines.extend(fields);
    lines.push("}".to_string());
    lines.push("".to_string());
    lines.push(format!("impl Default for {} {{", name));
    lines.push("    fn default() -> Self {".to_string());
    lines.push(format!("        {} {{", name));
    lines.extend(defaults);
    lines.push("        }".to_string());
    lines.push("    }".to_string());
    lines.push("}".to_string());
    Ok(lines.join("\n"))
}

/// Generates `impl Encoded for <root>` with every routine inlined.
fn generate_encoded_impl(root: &Composite, schema: &TypeSchema) -> String {
    let name = struct_name(root);
    let mut lines = Vec::new();

    lines.push("#[allow(unused_mut, unused_variables, unused_assignments)]".to_string());
    lines.push(format!("impl Encoded for {} {{", name));

    lines.push("    fn size_of(&self) -> usize {".to_string());
    match synthesize_size(schema).static_size() {
        Some(n) => lines.push(format!("        {}", n)),
        None => {
            lines.push("        let mut n = 0usize;".to_string());
            gen_size(&mut lines, 2, schema, &Place::owned("self"), 0);
            lines.push("        n".to_string());
        }
    }
    lines.push("    }".to_string());
    lines.push("".to_string());

    lines.push("    fn encode_into(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {".to_string());
    lines.push("        let needed = self.size_of();".to_string());
    lines.push("        if buf.len() < needed {".to_string());
    lines.push("            return Err(EncodeError::BufferTooSmall { needed, available: buf.len() });".to_string());
    lines.push("        }".to_string());
    lines.push("        let mut bb = ByteBufferMut::new(buf);".to_string());
    gen_encode(&mut lines, 2, schema, &Place::owned("self"), None, 0);
    lines.push("        Ok(bb.len())".to_string());
    lines.push("    }".to_string());
    lines.push("".to_string());

    lines.push("    fn decode_prefix(buf: &[u8], obj: &mut Self) -> Result<usize, DecodeError> {".to_string());
    lines.push("        let mut bb = ByteBuffer::new(buf);".to_string());
    gen_decode(&mut lines, 2, schema, &Place::owned("obj"), None, 0);
    lines.push("        Ok(bb.index())".to_string());
    lines.push("    }".to_string());
    lines.push("}".to_string());

    lines.join("\n")
}

/// Compiles a verified top-level schema into Rust source: one struct per
/// distinct composite and an `Encoded` impl for the root.
pub fn compile_schema_to_rust(schema: &TypeSchema, options: &GenOptions) -> Result<String, CompileError> {
    compile_schemas_to_rust(std::slice::from_ref(schema), options)
}

/// Like [compile_schema_to_rust] for several roots written to one file.
/// Structs shared between roots are emitted once; each root gets its own
/// `Encoded` impl, in the order given.
pub fn compile_schemas_to_rust(schemas: &[TypeSchema], options: &GenOptions) -> Result<String, CompileError> {
    if schemas.is_empty() {
        return Err(CompileError::CodegenError("no top-level types given".to_string()));
    }

    let mut roots: Vec<(&Composite, &TypeSchema)> = Vec::new();
    let mut structs = Vec::new();
    for schema in schemas {
        verify_schema(schema)?;
        let TypeSchema::Composite(root) = schema else {
            return Err(CompileError::CodegenError(format!("{} is not a struct", schema)));
        };
        collect_structs(schema, &mut structs)?;
        if !roots.iter().any(|(seen, _)| *seen == root) {
            roots.push((root, schema));
        }
    }
    debug!(roots = roots.len(), structs = structs.len(), "generating rust");

    let mut rust_code: Vec<String> = Vec::new();
    rust_code.push("// Code generated by wirecast. DO NOT EDIT.".to_string());
    rust_code.push("".to_string());

    // Start module
    if let Some(name) = &options.module {
        rust_code.push(format!("pub mod {} {{", escape_rust_keyword(&to_snake_case(name))));
    }

    // Add necessary imports
    if schemas.iter().any(uses_hash_map) {
        rust_code.push("use std::collections::HashMap;".to_string());
    }
    rust_code.push(format!(
        "use {}::{{ByteBuffer, ByteBufferMut, DecodeError, EncodeError, Encoded}};",
        options.runtime_crate
    ));
    rust_code.push("".to_string());

    for c in &structs {
        rust_code.push(generate_struct(c)?);
        rust_code.push("".to_string());
    }
    let impls: Vec<String> = roots.iter().map(|(root, schema)| generate_encoded_impl(root, schema)).collect();
    rust_code.push(impls.join("\n\n"));

    if options.module.is_some() {
        rust_code.push("}".to_string());
    }

    Ok(rust_code.join("\n") + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirecast_schema::{Field, FieldOptions};

    fn p(primitive: Primitive) -> TypeSchema {
        TypeSchema::primitive(primitive)
    }

    #[test]
    fn test_naming() {
        assert_eq!(to_snake_case("NamedByteArray"), "named_byte_array");
        assert_eq!(to_snake_case("sessionID"), "session_id");
        assert_eq!(to_snake_case("Uint8"), "uint8");
        assert_eq!(field_name("Type"), "type_");
        assert_eq!(field_name("Self"), "self_");
        assert_eq!(to_pascal_case("demo_struct"), "DemoStruct");
        assert_eq!(to_pascal_case("HASH"), "Hash");
        assert_eq!(to_pascal_case("innerThing"), "InnerThing");
    }

    #[test]
    fn test_rust_types() {
        let t = TypeSchema::map(
            p(Primitive::String),
            TypeSchema::fixed_array(TypeSchema::list(p(Primitive::Uint8)), 10),
        );
        assert_eq!(rust_type(&t), "HashMap<String, [Vec<u8>; 10]>");
        assert_eq!(zero_expr(&TypeSchema::fixed_array(p(Primitive::Uint8), 20)), "[0u8; 20]");
        assert_eq!(zero_expr(&TypeSchema::fixed_array(p(Primitive::Int64), 3)), "std::array::from_fn(|_| 0)");
    }

    #[test]
    fn test_generate_static_struct() {
        let schema = TypeSchema::composite("StaticStruct", vec![
            Field::new("A", p(Primitive::Uint8)),
            Field::new("B", p(Primitive::Int32)),
            Field::new("Hash", TypeSchema::fixed_array(p(Primitive::Uint8), 20)),
            Field::new("hidden", p(Primitive::Uint64)).unexported(),
        ]);
        let code = compile_schema_to_rust(&schema, &GenOptions::default()).unwrap();

        assert!(code.starts_with("// Code generated by wirecast. DO NOT EDIT.\n"));
        assert!(code.contains("use wirecast::{ByteBuffer, ByteBufferMut, DecodeError, EncodeError, Encoded};"));
        assert!(!code.contains("HashMap"));
        assert!(code.contains("#[derive(Debug, Clone, PartialEq, Eq, Hash)]\npub struct StaticStruct {"));
        assert!(code.contains("    pub a: u8,\n    pub b: i32,\n    pub hash: [u8; 20],\n    hidden: u64,\n"));
        assert!(code.contains("    fn size_of(&self) -> usize {\n        25\n    }"));
        assert!(code.contains("        bb.write_i32(self.b)?;"));
        assert!(code.contains("        bb.write_bytes(&self.hash)?;"));
        assert!(code.contains("        obj.hash.copy_from_slice(bb.read_bytes(20)?);"));
        assert!(!code.contains("self.hidden"));
    }

    #[test]
    fn test_generate_dynamic_struct() {
        let inner = TypeSchema::composite("Inner", vec![
            Field::new("Foo", p(Primitive::String)).with_options(FieldOptions::max_length(4)),
            Field::new("Ratio", p(Primitive::Float32)),
        ]);
        let schema = TypeSchema::composite("Outer", vec![
            Field::new("Items", TypeSchema::map(p(Primitive::Int32), TypeSchema::list(inner))),
            Field::new("Extra", TypeSchema::list(p(Primitive::Uint8)))
                .with_options(FieldOptions { omit_empty: true, max_length: Some(3), ..Default::default() }),
        ]);
        let options = GenOptions { module: Some("Demo".to_string()), runtime_crate: "crate::rt".to_string() };
        let code = compile_schema_to_rust(&schema, &options).unwrap();

        assert!(code.contains("pub mod demo {"));
        assert!(code.contains("use std::collections::HashMap;"));
        assert!(code.contains("use crate::rt::{"));
        // nested structs come first
        let inner_at = code.find("pub struct Inner {").unwrap();
        let outer_at = code.find("pub struct Outer {").unwrap();
        assert!(inner_at < outer_at);
        assert!(code.contains("#[derive(Debug, Clone, PartialEq)]\npub struct Inner {"));
        assert!(code.contains("    pub items: HashMap<i32, Vec<Inner>>,"));
        assert!(code.contains("bb.write_string_max(&x1.foo, Some(4))?;"));
        assert!(code.contains("x1.foo = bb.read_string_max(Some(4))?;"));
        assert!(code.contains("if entries0.contains_key(&k0) {"));
        assert!(code.contains("        if !self.extra.is_empty() {"));
        assert!(code.contains("            bb.write_len(self.extra.len(), Some(3))?;"));
        assert!(code.contains("        if bb.remaining() == 0 {\n            obj.extra = Vec::new();\n        } else {"));
        assert!(code.trim_end().ends_with('}'));
    }

    #[test]
    fn test_generate_several_roots() {
        let shared = TypeSchema::composite("Header", vec![Field::new("Seq", p(Primitive::Uint64))]);
        let ping = TypeSchema::composite("Ping", vec![Field::new("Head", shared.clone())]);
        let pong = TypeSchema::composite("Pong", vec![
            Field::new("Head", shared),
            Field::new("Peers", TypeSchema::map(p(Primitive::String), p(Primitive::Uint16))),
        ]);
        let code = compile_schemas_to_rust(&[ping.clone(), pong, ping.clone()], &GenOptions::default()).unwrap();

        assert_eq!(code.matches("pub struct Header {").count(), 1);
        assert_eq!(code.matches("impl Encoded for Ping {").count(), 1);
        assert_eq!(code.matches("impl Encoded for Pong {").count(), 1);
        assert!(code.find("impl Encoded for Ping {").unwrap() < code.find("impl Encoded for Pong {").unwrap());
        assert!(code.contains("use std::collections::HashMap;"));
        assert!(code.contains("    }\n}\n\n#[allow(unused_mut, unused_variables, unused_assignments)]\nimpl Encoded for Pong {"));

        // a single root renders the same either way
        assert_eq!(
            compile_schemas_to_rust(&[ping.clone()], &GenOptions::default()).unwrap(),
            compile_schema_to_rust(&ping, &GenOptions::default()).unwrap()
        );

        let other_header = TypeSchema::composite("Header", vec![Field::new("Seq", p(Primitive::Uint32))]);
        let clash = TypeSchema::composite("Other", vec![Field::new("Head", other_header)]);
        assert!(matches!(
            compile_schemas_to_rust(&[ping, clash], &GenOptions::default()),
            Err(CompileError::CodegenError(_))
        ));
        assert!(matches!(
            compile_schemas_to_rust(&[], &GenOptions::default()),
            Err(CompileError::CodegenError(_))
        ));
    }

    #[test]
    fn test_generate_errors() {
        let float_key = TypeSchema::composite("S", vec![
            Field::new("M", TypeSchema::map(p(Primitive::Float64), p(Primitive::Bool))),
        ]);
        assert!(matches!(
            compile_schema_to_rust(&float_key, &GenOptions::default()),
            Err(CompileError::CodegenError(_))
        ));

        let clash = TypeSchema::composite("S", vec![
            Field::new("FooBar", p(Primitive::Bool)),
            Field::new("foo_bar", p(Primitive::Bool)).unexported(),
        ]);
        assert!(matches!(
            compile_schema_to_rust(&clash, &GenOptions::default()),
            Err(CompileError::CodegenError(_))
        ));

        assert!(matches!(
            compile_schema_to_rust(&p(Primitive::Bool), &GenOptions::default()),
            Err(CompileError::Schema(_))
        ));
    }
}
