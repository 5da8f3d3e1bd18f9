use serde::Serialize;

/// A parsed `.wire` file, before name resolution.
#[derive(Debug, PartialEq, Serialize)]
pub struct Declarations {
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeExpr {
    Named {
        name:   String,
        line:   usize,
        column: usize,
    },
    FixedArray { length: usize, elem: Box<TypeExpr> },
    List { elem: Box<TypeExpr> },
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name:    String,
    pub line:    usize,
    pub column:  usize,
    #[serde(rename = "type")]
    pub type_:   TypeExpr,
    pub private: bool,
    pub tag:     Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DefinitionKind {
    Struct(Vec<Field>),
    Alias(TypeExpr),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Definition {
    pub name:   String,
    pub line:   usize,
    pub column: usize,
    pub kind:   DefinitionKind,
}
