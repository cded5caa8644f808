//! Symbols and the semantic service.
//!
//! A [`SemanticModel`] answers the three questions declaration tooling asks
//! about a type declaration: what symbol it declares, which symbol one of its
//! attributes binds to, and which symbol one of its base-list entries binds
//! to. [`DeclarationTable`] is the built-in binder over parsed sources; hosts
//! with a full compiler can plug in their own implementation.

mod binder;

use std::fmt;
use std::sync::Arc;

use crate::ast::{Attribute, BaseType, TypeDecl, TypeKind};
use crate::compilation::TreeId;

pub use binder::DeclarationTable;

/// Metadata name of a type: namespace-qualified, with a `` `N `` generic
/// arity suffix (`Shapes.Circle`, ``Shapes.Box`1``).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(Arc<str>);

impl SymbolId {
    #[must_use]
    pub fn new(metadata_name: impl Into<Arc<str>>) -> Self {
        Self(metadata_name.into())
    }

    #[must_use]
    pub fn from_parts(namespace: &Namespace, name: &str, arity: usize) -> Self {
        Self::new(namespace.qualify(&metadata_name(name, arity)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn metadata_name(name: &str, arity: usize) -> String {
    if arity == 0 {
        name.to_owned()
    } else {
        format!("{name}`{arity}")
    }
}

/// Namespace containing a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Namespace {
    #[default]
    Global,
    Named(String),
}

impl Namespace {
    /// `""` maps to the global namespace.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.is_empty() {
            Self::Global
        } else {
            Self::Named(name.to_owned())
        }
    }

    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Named(name) => Some(name),
        }
    }

    /// `name` qualified by this namespace.
    #[must_use]
    pub fn qualify(&self, name: &str) -> String {
        match self {
            Self::Global => name.to_owned(),
            Self::Named(ns) => format!("{ns}.{name}"),
        }
    }

    /// Child namespace `self.segment`.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        Self::Named(self.qualify(segment))
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("<global namespace>"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// A declared type as the semantic service sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub namespace: Namespace,
    pub kind: TypeKind,
    pub arity: usize,
}

pub trait SemanticModel: Send + Sync {
    /// Symbol declared by `decl`, which must belong to tree `tree`.
    fn declared_symbol(&self, tree: TreeId, decl: &TypeDecl) -> Option<Symbol>;

    /// Type an attribute on `decl` binds to, `None` when unresolvable or ambiguous.
    fn resolve_attribute(
        &self,
        tree: TreeId,
        decl: &TypeDecl,
        attribute: &Attribute,
    ) -> Option<SymbolId>;

    /// Type a base-list entry of `decl` binds to, `None` when unresolvable or ambiguous.
    fn resolve_base_type(&self, tree: TreeId, decl: &TypeDecl, base: &BaseType)
    -> Option<SymbolId>;
}
