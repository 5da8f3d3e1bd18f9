use std::collections::HashMap;

use tracing::{debug, trace};
use wirecast_schema::{verify_schema, Field, FieldOptions, Primitive, TypeSchema};

use crate::{
    error::CompileError,
    parser::parse_schema,
    tokenizer::tokenize_schema,
    types::{Declarations, Definition, DefinitionKind, TypeExpr},
    utils::{quote, resolve_error},
};

/// Compile declaration text into the verified schema of the struct or alias
/// named `root`.
pub fn compile_schema(text: &str, root: &str) -> Result<TypeSchema, CompileError> {
    let decls = parse_declarations(text)?;
    let schema = resolve_schema(&decls, root)?;
    verify_schema(&schema)?;
    debug!(root, definitions = decls.definitions.len(), "compiled schema");
    Ok(schema)
}

pub fn parse_declarations(text: &str) -> Result<Declarations, CompileError> {
    let tokens = tokenize_schema(text)?;
    parse_schema(&tokens)
}

/// Resolves every named type in `decls` and returns the tree rooted at
/// `root`. All definitions are checked, not only those `root` reaches.
pub fn resolve_schema(decls: &Declarations, root: &str) -> Result<TypeSchema, CompileError> {
    let resolver = Resolver::new(decls)?;

    for def in &decls.definitions {
        resolver.resolve_definition(def, &mut Vec::new())?;
    }

    let def = resolver
        .definitions
        .get(root)
        .copied()
        .ok_or_else(|| CompileError::UnknownRoot(root.to_owned()))?;
    resolver.resolve_definition(def, &mut Vec::new())
}

struct Resolver<'a> {
    definitions: HashMap<&'a str, &'a Definition>,
}

impl<'a> Resolver<'a> {
    fn new(decls: &'a Declarations) -> Result<Resolver<'a>, CompileError> {
        let mut definitions = HashMap::new();

        // Check duplicate / reserved type names
        for def in &decls.definitions {
            if Primitive::from_name(&def.name).is_some() {
                return Err(resolve_error(
                    &format!("The type name {} is reserved", quote(&def.name)),
                    def.line,
                    def.column,
                ));
            }
            if definitions.insert(def.name.as_str(), def).is_some() {
                return Err(resolve_error(
                    &format!("The type {} is defined twice", quote(&def.name)),
                    def.line,
                    def.column,
                ));
            }
        }

        Ok(Resolver { definitions })
    }

    /// `stack` holds the definitions being expanded; meeting one of them
    /// again means the type contains itself.
    fn resolve_definition(&self, def: &'a Definition, stack: &mut Vec<&'a str>) -> Result<TypeSchema, CompileError> {
        if stack.contains(&def.name.as_str()) {
            return Err(resolve_error(
                &format!("Recursive type {} is not allowed", quote(&def.name)),
                def.line,
                def.column,
            ));
        }
        stack.push(&def.name);
        trace!(name = %def.name, depth = stack.len(), "resolving definition");

        let resolved = match &def.kind {
            DefinitionKind::Alias(aliased) => self.resolve_type(aliased, stack)?,
            DefinitionKind::Struct(fields) => {
                let mut seen: Vec<&str> = Vec::new();
                let mut resolved = Vec::with_capacity(fields.len());
                for field in fields {
                    if seen.contains(&field.name.as_str()) {
                        return Err(resolve_error(
                            &format!("The field {} is defined twice in {}", quote(&field.name), quote(&def.name)),
                            field.line,
                            field.column,
                        ));
                    }
                    seen.push(&field.name);

                    let options = match &field.tag {
                        Some(tag) => FieldOptions::parse_tag(tag)
                            .map_err(|e| resolve_error(&e.to_string(), field.line, field.column))?,
                        None => FieldOptions::default(),
                    };
                    let mut f = Field::new(&field.name, self.resolve_type(&field.type_, stack)?)
                        .with_options(options);
                    f.exported = !field.private;
                    resolved.push(f);
                }
                TypeSchema::composite(&def.name, resolved)
            }
        };

        stack.pop();
        Ok(resolved)
    }

    fn resolve_type(&self, expr: &'a TypeExpr, stack: &mut Vec<&'a str>) -> Result<TypeSchema, CompileError> {
        Ok(match expr {
            TypeExpr::Named { name, line, column } => {
                if let Some(primitive) = Primitive::from_name(name) {
                    return Ok(TypeSchema::primitive(primitive));
                }
                let def = self.definitions.get(name.as_str()).copied().ok_or_else(|| {
                    resolve_error(&format!("The type {} is not defined", quote(name)), *line, *column)
                })?;
                self.resolve_definition(def, stack)?
            }
            TypeExpr::FixedArray { length, elem } => TypeSchema::fixed_array(self.resolve_type(elem, stack)?, *length),
            TypeExpr::List { elem } => TypeSchema::list(self.resolve_type(elem, stack)?),
            TypeExpr::Map { key, value } => {
                TypeSchema::map(self.resolve_type(key, stack)?, self.resolve_type(value, stack)?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirecast_schema::SchemaError;

    #[test]
    fn compile_resolves_aliases_and_nesting() {
        let text = r#"
            type Hash = [20]byte;
            type Coins = uint64;

            struct Inner {
                A byte;
                priv secret int64;
            }

            struct Outer {
                Id    Hash;
                Money Coins;
                In    Inner;
                Tags  []string ",maxlen=2";
            }
        "#;
        let schema = compile_schema(text, "Outer").unwrap();
        let TypeSchema::Composite(outer) = &schema else {
            panic!("expected a struct");
        };
        assert_eq!(outer.name, "Outer");
        assert_eq!(outer.fields[0].type_.to_string(), "[20]uint8");
        assert_eq!(outer.fields[1].type_, TypeSchema::primitive(Primitive::Uint64));
        assert_eq!(outer.fields[3].options, FieldOptions::max_length(2));

        let TypeSchema::Composite(inner) = &outer.fields[2].type_ else {
            panic!("expected a nested struct");
        };
        assert!(inner.fields[0].exported);
        assert!(!inner.fields[1].exported);
    }

    #[test]
    fn compile_rejects_bad_names() {
        let err = compile_schema("struct A { B C; }", "A").unwrap_err();
        assert!(matches!(err, CompileError::ResolveError { line: 1, column: 14, .. }), "got {:?}", err);

        let err = compile_schema("struct A { B int8; }\nstruct A { C int8; }", "A").unwrap_err();
        assert!(matches!(err, CompileError::ResolveError { line: 2, .. }), "got {:?}", err);

        let err = compile_schema("type string = int8;", "string").unwrap_err();
        assert!(matches!(err, CompileError::ResolveError { .. }), "got {:?}", err);

        let err = compile_schema("struct A { B int8; B int16; }", "A").unwrap_err();
        assert!(matches!(err, CompileError::ResolveError { .. }), "got {:?}", err);

        let err = compile_schema("struct A { B int8; }", "Missing").unwrap_err();
        assert!(matches!(err, CompileError::UnknownRoot(_)), "got {:?}", err);
    }

    #[test]
    fn compile_rejects_recursion() {
        for text in [
            "struct A { Next []A; }",
            "struct A { B B; }\nstruct B { Items map[string]A; }",
            "type L = []L;",
        ] {
            let err = compile_schema(text, "A").unwrap_err();
            assert!(matches!(err, CompileError::ResolveError { .. }), "{}: got {:?}", text, err);
        }
    }

    #[test]
    fn compile_runs_schema_verification() {
        let err = compile_schema("struct A { B []byte \",omitempty\"; C int8; }", "A").unwrap_err();
        assert!(matches!(err, CompileError::Schema(SchemaError::OmitEmptyNotLast(_))), "got {:?}", err);

        let err = compile_schema("type T = []int8;", "T").unwrap_err();
        assert!(matches!(err, CompileError::Schema(SchemaError::NotComposite(_))), "got {:?}", err);

        let err = compile_schema("struct A { B int8 \",bogus\"; }", "A").unwrap_err();
        assert!(matches!(err, CompileError::ResolveError { .. }), "got {:?}", err);
    }
}
