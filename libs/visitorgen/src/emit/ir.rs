//! Declaration IR for generated sources.

/// A generated file: `using` directives followed by items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFile {
    pub usings: Vec<String>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Namespace(NamespaceNode),
    Type(TypeNode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceNode {
    pub name: String,
    pub items: Vec<Item>,
}

/// `<modifiers> <keyword> <name><type parameters>` with method members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNode {
    pub modifiers: Vec<String>,
    pub keyword: String,
    pub name: String,
    pub type_parameters: Vec<String>,
    pub methods: Vec<MethodNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodNode {
    pub modifiers: Vec<String>,
    pub return_type: String,
    pub name: String,
    pub type_parameters: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub body: MethodBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodBody {
    /// Declaration only, terminated by `;`.
    Signature,
    /// `=> <expr>;`
    Expression(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub ty: String,
    pub name: String,
}

impl Parameter {
    #[must_use]
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

/// Wraps `item` in `namespace` unless it is `None` (the global namespace).
#[must_use]
pub fn in_namespace(namespace: Option<&str>, items: Vec<Item>) -> Vec<Item> {
    match namespace {
        Some(name) => vec![Item::Namespace(NamespaceNode {
            name: name.to_owned(),
            items,
        })],
        None => items,
    }
}
