//! Name binding over parsed declarations.
//!
//! Lookup follows the C# rules for type names at namespace level: the
//! enclosing namespaces are searched innermost first, and at each level the
//! types declared in that namespace win over types imported by that level's
//! `using` directives. Two imports offering the same simple name make the name
//! ambiguous and it binds to nothing. Nested types, static usings and
//! referenced assemblies are out of reach; such names simply do not resolve.

use std::collections::{BTreeSet, HashMap};

use crate::ast::{Attribute, BaseType, Member, TypeDecl, UsingDirective, UsingKind};
use crate::compilation::{SyntaxTree, TreeId};

use super::{Namespace, SemanticModel, Symbol, SymbolId, metadata_name};

#[derive(Debug)]
struct Scope {
    namespace: Namespace,
    usings: Vec<UsingDirective>,
    /// `None` for a compilation-unit scope.
    parent: Option<usize>,
}

#[derive(Debug)]
struct DeclEntry {
    symbol: Symbol,
    scope: usize,
}

/// Outcome of consulting one level's `using` directives.
enum Imported {
    Found(SymbolId),
    Ambiguous,
    NotFound,
}

/// Binder built from every declaration in a compilation.
#[derive(Debug, Default)]
pub struct DeclarationTable {
    types: HashMap<String, Symbol>,
    decls: HashMap<(TreeId, u32), DeclEntry>,
    scopes: Vec<Scope>,
    global_usings: Vec<UsingDirective>,
}

impl DeclarationTable {
    #[must_use]
    pub fn build(trees: &[SyntaxTree]) -> Self {
        let mut table = Self::default();
        for tree in trees {
            collect_global_usings(&tree.root().usings, &tree.root().members, &mut table.global_usings);
        }
        for tree in trees {
            let root = tree.root();
            table.scopes.push(Scope {
                namespace: Namespace::Global,
                usings: root.usings.iter().filter(|u| !u.global).cloned().collect(),
                parent: None,
            });
            let scope = table.scopes.len() - 1;
            table.index_members(tree.id(), &root.members, scope);
        }
        tracing::debug!(
            types = table.types.len(),
            declarations = table.decls.len(),
            global_usings = table.global_usings.len(),
            "declaration table built"
        );
        table
    }

    #[must_use]
    pub fn symbol(&self, id: &SymbolId) -> Option<&Symbol> {
        self.types.get(id.as_str())
    }

    /// Number of distinct declared types. Partial declarations count once.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn index_members(&mut self, tree: TreeId, members: &[Member], scope: usize) {
        for member in members {
            match member {
                Member::Namespace(ns) => {
                    let mut current = scope;
                    for segment in ns.name.split('.') {
                        let namespace = self.scopes[current].namespace.child(segment);
                        self.scopes.push(Scope {
                            namespace,
                            usings: Vec::new(),
                            parent: Some(current),
                        });
                        current = self.scopes.len() - 1;
                    }
                    self.scopes[current].usings =
                        ns.usings.iter().filter(|u| !u.global).cloned().collect();
                    self.index_members(tree, &ns.members, current);
                }
                Member::Type(decl) => {
                    let namespace = self.scopes[scope].namespace.clone();
                    let id = SymbolId::from_parts(&namespace, &decl.name, decl.arity());
                    let symbol = Symbol {
                        id: id.clone(),
                        name: decl.name.clone(),
                        namespace,
                        kind: decl.kind,
                        arity: decl.arity(),
                    };
                    self.types
                        .entry(id.as_str().to_owned())
                        .or_insert_with(|| symbol.clone());
                    self.decls
                        .insert((tree, decl.ordinal), DeclEntry { symbol, scope });
                }
            }
        }
    }

    fn lookup(&self, metadata: &str) -> Option<SymbolId> {
        self.types.get(metadata).map(|s| s.id.clone())
    }

    fn frame_usings<'a>(&'a self, frame: &'a Scope) -> impl Iterator<Item = &'a UsingDirective> {
        let globals: &[UsingDirective] = if frame.parent.is_none() {
            &self.global_usings
        } else {
            &[]
        };
        frame.usings.iter().chain(globals)
    }

    fn resolve_name(&self, tree: TreeId, decl: &TypeDecl, text: &str) -> Option<SymbolId> {
        let type_ref = TypeRef::parse(text)?;
        let entry = self.decls.get(&(tree, decl.ordinal))?;
        if entry.symbol.name != decl.name {
            return None;
        }
        if type_ref.absolute {
            return self.lookup(&type_ref.metadata());
        }

        let mut scope = Some(entry.scope);
        while let Some(idx) = scope {
            let frame = &self.scopes[idx];
            scope = frame.parent;

            if let Some(alias) = type_ref.alias {
                if let Some(target) = self.alias_target(frame, alias) {
                    return self.lookup(&format!("{target}.{}", type_ref.metadata()));
                }
                continue;
            }

            if let Some(id) = self.lookup(&frame.namespace.qualify(&type_ref.metadata())) {
                return Some(id);
            }
            match self.import(frame, &type_ref) {
                Imported::Found(id) => return Some(id),
                Imported::Ambiguous => return None,
                Imported::NotFound => {}
            }
        }
        None
    }

    fn alias_target<'a>(&'a self, frame: &'a Scope, alias: &str) -> Option<&'a str> {
        self.frame_usings(frame).find_map(|using| match &using.kind {
            UsingKind::Alias(name) if name == alias => Some(using.target.as_str()),
            _ => None,
        })
    }

    fn import(&self, frame: &Scope, type_ref: &TypeRef<'_>) -> Imported {
        let (first, rest) = match type_ref.segments.split_first() {
            Some(parts) => parts,
            None => return Imported::NotFound,
        };

        if let Some(target) = self.alias_target(frame, first) {
            if rest.is_empty() {
                return match TypeRef::parse(target) {
                    Some(aliased) if type_ref.arity == 0 => self
                        .lookup(&aliased.metadata())
                        .map_or(Imported::Ambiguous, Imported::Found),
                    _ => Imported::Ambiguous,
                };
            }
            let qualified = format!("{target}.{}", type_ref.metadata_from(1));
            return self
                .lookup(&qualified)
                .map_or(Imported::NotFound, Imported::Found);
        }

        if !rest.is_empty() {
            return Imported::NotFound;
        }

        let hits: BTreeSet<SymbolId> = self
            .frame_usings(frame)
            .filter(|using| using.kind == UsingKind::Namespace)
            .filter_map(|using| {
                self.lookup(&format!("{}.{}", using.target, type_ref.metadata()))
            })
            .collect();
        let mut hits = hits.into_iter();
        match (hits.next(), hits.next()) {
            (Some(id), None) => Imported::Found(id),
            (Some(_), Some(_)) => Imported::Ambiguous,
            _ => Imported::NotFound,
        }
    }
}

impl SemanticModel for DeclarationTable {
    fn declared_symbol(&self, tree: TreeId, decl: &TypeDecl) -> Option<Symbol> {
        self.decls
            .get(&(tree, decl.ordinal))
            .filter(|entry| entry.symbol.name == decl.name)
            .map(|entry| entry.symbol.clone())
    }

    fn resolve_attribute(
        &self,
        tree: TreeId,
        decl: &TypeDecl,
        attribute: &Attribute,
    ) -> Option<SymbolId> {
        let exact = self.resolve_name(tree, decl, &attribute.name);
        let suffixed = self.resolve_name(tree, decl, &with_attribute_suffix(&attribute.name));
        match (exact, suffixed) {
            (Some(a), Some(b)) if a != b => None,
            (Some(id), _) | (None, Some(id)) => Some(id),
            (None, None) => None,
        }
    }

    fn resolve_base_type(
        &self,
        tree: TreeId,
        decl: &TypeDecl,
        base: &BaseType,
    ) -> Option<SymbolId> {
        self.resolve_name(tree, decl, &base.text)
    }
}

fn collect_global_usings(
    usings: &[UsingDirective],
    members: &[Member],
    out: &mut Vec<UsingDirective>,
) {
    out.extend(usings.iter().filter(|u| u.global).cloned());
    for member in members {
        if let Member::Namespace(ns) = member {
            collect_global_usings(&ns.usings, &ns.members, out);
        }
    }
}

/// `Ns.VisitorNode` -> `Ns.VisitorNodeAttribute`, generic arguments kept in place.
fn with_attribute_suffix(name: &str) -> String {
    match name.find('<') {
        Some(open) => format!("{}Attribute{}", &name[..open], &name[open..]),
        None => format!("{name}Attribute"),
    }
}

/// A type name as written in source, split for lookup.
#[derive(Debug, PartialEq, Eq)]
struct TypeRef<'a> {
    absolute: bool,
    alias: Option<&'a str>,
    segments: Vec<&'a str>,
    arity: usize,
}

impl<'a> TypeRef<'a> {
    fn parse(text: &'a str) -> Option<Self> {
        let text = text.trim();
        let text = text.strip_suffix('?').unwrap_or(text).trim_end();
        let (absolute, alias, rest) = match text.split_once("::") {
            Some((qualifier, rest)) if qualifier.trim() == "global" => (true, None, rest),
            Some((qualifier, rest)) => (false, Some(qualifier.trim()), rest),
            None => (false, None, text),
        };

        let (name, arity) = match rest.find('<') {
            Some(open) => {
                let args = rest[open + 1..].strip_suffix('>')?;
                (&rest[..open], count_type_arguments(args)?)
            }
            None => (rest, 0),
        };

        let segments: Vec<&str> = name.split('.').map(str::trim).collect();
        if !segments.iter().all(|s| is_identifier(s)) {
            return None;
        }
        Some(Self {
            absolute,
            alias,
            segments,
            arity,
        })
    }

    fn metadata(&self) -> String {
        self.metadata_from(0)
    }

    /// Metadata name built from `segments[skip..]`.
    fn metadata_from(&self, skip: usize) -> String {
        let segments = &self.segments[skip.min(self.segments.len())..];
        match segments.split_last() {
            Some((last, init)) if init.is_empty() => metadata_name(last, self.arity),
            Some((last, init)) => format!("{}.{}", init.join("."), metadata_name(last, self.arity)),
            None => String::new(),
        }
    }
}

/// Number of top-level type arguments in `A, B<C, D>`; `None` when unbalanced.
fn count_type_arguments(args: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut count = 1;
    for c in args.chars() {
        match c {
            '<' | '(' => depth += 1,
            '>' | ')' => depth -= 1,
            ',' if depth == 0 => count += 1,
            _ => {}
        }
        if depth < 0 {
            return None;
        }
    }
    (depth == 0).then_some(count)
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}
