//! Declaration trees.
//!
//! A parsed file keeps only what declaration-level tooling needs: `using`
//! directives, namespace nesting, and type headers (attributes, modifiers,
//! name, type parameters, base list). Member bodies are not represented.

use std::fmt;

use serde::Serialize;

use crate::span::Span;

/// Root of one parsed file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationUnit {
    pub usings: Vec<UsingDirective>,
    pub members: Vec<Member>,
}

impl CompilationUnit {
    /// Every type declaration in document order, descending into namespaces.
    #[must_use]
    pub fn type_declarations(&self) -> Vec<&TypeDecl> {
        let mut out = Vec::new();
        collect_types(&self.members, &mut out);
        out
    }
}

fn collect_types<'a>(members: &'a [Member], out: &mut Vec<&'a TypeDecl>) {
    for member in members {
        match member {
            Member::Namespace(ns) => collect_types(&ns.members, out),
            Member::Type(decl) => out.push(decl),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Namespace(NamespaceDecl),
    Type(TypeDecl),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    /// Dotted name as written, e.g. `Company.Shapes`.
    pub name: String,
    /// `namespace A;` rather than `namespace A { ... }`.
    pub file_scoped: bool,
    pub usings: Vec<UsingDirective>,
    pub members: Vec<Member>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingDirective {
    pub kind: UsingKind,
    /// Target name as written, without `global::`.
    pub target: String,
    /// `global using ...;`
    pub global: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsingKind {
    Namespace,
    Static,
    Alias(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Record,
    RecordStruct,
}

impl TypeKind {
    /// Declaration keyword(s) as they appear in source.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Record => "record",
            Self::RecordStruct => "record struct",
        }
    }

    /// Kinds that can implement an interface and carry instance methods.
    #[must_use]
    pub const fn is_implementor(self) -> bool {
        matches!(
            self,
            Self::Class | Self::Struct | Self::Record | Self::RecordStruct
        )
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

const ACCESSIBILITY_MODIFIERS: &[&str] = &["public", "protected", "internal", "private", "file"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Position of this declaration among the type declarations of its file.
    pub ordinal: u32,
    pub kind: TypeKind,
    pub name: String,
    pub type_parameters: Vec<String>,
    pub modifiers: Vec<String>,
    pub attributes: Vec<AttributeList>,
    pub base_list: Vec<BaseType>,
    /// Span of the declared name.
    pub name_span: Span,
    /// Span of the whole declaration, attributes through closing brace.
    pub span: Span,
}

impl TypeDecl {
    #[must_use]
    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.has_modifier("partial")
    }

    /// `file` types are visible in their own source only and cannot be
    /// continued in another file.
    #[must_use]
    pub fn is_file_local(&self) -> bool {
        self.has_modifier("file")
    }

    /// Declared accessibility, e.g. `public` or `protected internal`.
    #[must_use]
    pub fn accessibility(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .modifiers
            .iter()
            .map(String::as_str)
            .filter(|m| ACCESSIBILITY_MODIFIERS.contains(m))
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    /// Every attribute across all attribute lists, in source order.
    pub fn all_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().flat_map(|list| list.attributes.iter())
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.type_parameters.len()
    }
}

/// One `[...]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeList {
    /// Explicit target such as `assembly` or `type`.
    pub target: Option<String>,
    pub attributes: Vec<Attribute>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Name as written: `VisitorNode`, `VisitorGenerator.VisitorNodeAttribute`, `global::X`.
    pub name: String,
    pub span: Span,
}

/// One entry of a type's base list, generic arguments included, constructor
/// arguments (records) excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseType {
    pub text: String,
    pub span: Span,
}

impl BaseType {
    /// The identifier when the entry is a bare name: `INode` but not
    /// `Ns.INode`, `INode<T>` or `global::INode`.
    #[must_use]
    pub fn simple_name(&self) -> Option<&str> {
        let text = self.text.trim();
        let mut chars = text.chars();
        let first = chars.next()?;
        let is_plain = (first == '_' || first.is_alphabetic())
            && chars.all(|c| c == '_' || c.is_alphanumeric());
        is_plain.then_some(text)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn base(text: &str) -> BaseType {
        BaseType {
            text: text.to_owned(),
            span: Span::default(),
        }
    }

    #[test]
    fn simple_name_accepts_only_bare_identifiers() {
        assert_eq!(base(" INode ").simple_name(), Some("INode"));
        assert_eq!(base("Shapes.INode").simple_name(), None);
        assert_eq!(base("INode<int>").simple_name(), None);
        assert_eq!(base("global::INode").simple_name(), None);
        assert_eq!(base("").simple_name(), None);
    }

    #[test]
    fn accessibility_joins_compound_modifiers() {
        let decl = TypeDecl {
            ordinal: 0,
            kind: TypeKind::Class,
            name: "A".to_owned(),
            type_parameters: vec![],
            modifiers: vec![
                "protected".to_owned(),
                "internal".to_owned(),
                "sealed".to_owned(),
                "partial".to_owned(),
            ],
            attributes: vec![],
            base_list: vec![],
            name_span: Span::default(),
            span: Span::default(),
        };
        assert_eq!(decl.accessibility().as_deref(), Some("protected internal"));
        assert!(decl.is_partial());
    }
}
