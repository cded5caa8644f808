//! Maps declarations to symbol identity and namespace.

use std::collections::{HashMap, HashSet};

use visitorgen_syntax::{Compilation, SymbolId, SyntaxTree, TypeDecl};

use crate::model::{Hierarchy, ImplementingType, MarkedRoot};
use crate::walker::Candidate;

pub struct Resolver<'c> {
    compilation: &'c Compilation,
}

impl<'c> Resolver<'c> {
    pub fn new(compilation: &'c Compilation) -> Self {
        Self { compilation }
    }

    pub fn resolve_root(&self, tree: &SyntaxTree, decl: &TypeDecl) -> Option<MarkedRoot> {
        let location = tree.location(decl.name_span);
        let Some(symbol) = self
            .compilation
            .semantic_model()
            .declared_symbol(tree.id(), decl)
        else {
            tracing::trace!(name = %decl.name, %location, "skipping unresolvable root declaration");
            return None;
        };
        Some(MarkedRoot {
            name: decl.name.clone(),
            namespace: symbol.namespace,
            id: symbol.id,
            accessibility: decl.accessibility(),
            type_parameters: decl.type_parameters.clone(),
            location,
        })
    }

    pub fn resolve_type(&self, candidate: &Candidate<'_>) -> Option<ImplementingType> {
        let Candidate { tree, decl } = *candidate;
        let location = tree.location(decl.name_span);
        let Some(symbol) = self
            .compilation
            .semantic_model()
            .declared_symbol(tree.id(), decl)
        else {
            tracing::trace!(name = %decl.name, %location, "skipping unresolvable implementing type");
            return None;
        };
        Some(ImplementingType {
            name: decl.name.clone(),
            namespace: symbol.namespace,
            id: symbol.id,
            kind: decl.kind,
            accessibility: decl.accessibility(),
            type_parameters: decl.type_parameters.clone(),
            location,
        })
    }

    /// First explicit accessibility per declared class, struct or record,
    /// across every fragment in the compilation.
    fn declared_accessibility(&self) -> HashMap<SymbolId, String> {
        let model = self.compilation.semantic_model();
        let mut declared = HashMap::new();
        for tree in self.compilation.trees() {
            for decl in tree.root().type_declarations() {
                if !decl.kind.is_implementor() {
                    continue;
                }
                if let Some(access) = decl.accessibility()
                    && let Some(symbol) = model.declared_symbol(tree.id(), decl)
                {
                    declared.entry(symbol.id).or_insert(access);
                }
            }
        }
        declared
    }

    /// Resolves candidates in order, keeping the first fragment of each
    /// symbol, and collects the namespaces the combined artifact must import.
    /// A type whose first fragment has no accessibility modifier takes the
    /// one declared on a later fragment.
    pub fn resolve_hierarchy(&self, root: MarkedRoot, candidates: &[Candidate<'_>]) -> Hierarchy {
        let mut seen = HashSet::new();
        let mut types = Vec::new();
        for candidate in candidates {
            let Some(ty) = self.resolve_type(candidate) else {
                continue;
            };
            if seen.insert(ty.id.clone()) {
                tracing::debug!(root = %root.id, ty = %ty.id, location = %ty.location, "found implementing type");
                types.push(ty);
            }
        }

        if types.iter().any(|ty| ty.accessibility.is_none()) {
            let mut declared = self.declared_accessibility();
            for ty in types.iter_mut().filter(|ty| ty.accessibility.is_none()) {
                ty.accessibility = declared.remove(&ty.id);
            }
        }

        let mut usings: Vec<String> = Vec::new();
        for ty in &types {
            if ty.namespace == root.namespace {
                continue;
            }
            if let Some(ns) = ty.namespace.name()
                && !usings.iter().any(|u| u == ns)
            {
                usings.push(ns.to_owned());
            }
        }

        Hierarchy { root, types, usings }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use visitorgen_syntax::Namespace;

    fn compile(sources: &[&str]) -> Compilation {
        let mut builder = Compilation::builder();
        for (idx, src) in sources.iter().enumerate() {
            builder = builder.source(format!("f{idx}.cs"), *src).unwrap();
        }
        builder.build()
    }

    fn candidates(c: &Compilation) -> Vec<Candidate<'_>> {
        c.trees()
            .iter()
            .flat_map(|tree| {
                tree.root()
                    .type_declarations()
                    .into_iter()
                    .filter(|d| d.kind.is_implementor())
                    .map(move |decl| Candidate { tree, decl })
            })
            .collect()
    }

    fn root_of(c: &Compilation) -> MarkedRoot {
        let tree = &c.trees()[0];
        let decl = tree.root().type_declarations()[0];
        Resolver::new(c).resolve_root(tree, decl).unwrap()
    }

    #[test]
    fn usings_skip_root_and_global_namespaces_and_repeat() {
        let c = compile(&[
            "namespace A { interface IOp {} class Same : IOp {} }",
            "namespace B { class Do : A.IOp {} class Undo : A.IOp {} }",
            "class Top : A.IOp {}",
            "namespace C { class More : A.IOp {} }",
        ]);
        let root = root_of(&c);
        assert_eq!(root.namespace, Namespace::Named("A".to_owned()));
        let hierarchy = Resolver::new(&c).resolve_hierarchy(root, &candidates(&c));
        let names: Vec<_> = hierarchy.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Same", "Do", "Undo", "Top", "More"]);
        assert_eq!(hierarchy.usings, vec!["B", "C"]);
    }

    #[test]
    fn partial_fragments_of_a_type_are_merged() {
        let c = compile(&[
            "interface INode {} partial class Leaf : INode {}",
            "partial class Leaf : INode {}",
        ]);
        let root = root_of(&c);
        let hierarchy = Resolver::new(&c).resolve_hierarchy(root, &candidates(&c));
        assert_eq!(hierarchy.types.len(), 1);
        assert_eq!(hierarchy.types[0].location.path.to_string_lossy(), "f0.cs");
    }

    #[test]
    fn accessibility_is_taken_from_a_later_fragment() {
        let c = compile(&[
            "interface INode {} partial class Leaf : INode {} partial class Bare : INode {}",
            "public partial class Leaf {}",
        ]);
        let root = root_of(&c);
        let hierarchy = Resolver::new(&c).resolve_hierarchy(root, &candidates(&c));
        let access: Vec<_> = hierarchy
            .types
            .iter()
            .map(|t| (t.name.as_str(), t.accessibility.as_deref()))
            .collect();
        assert_eq!(access, vec![("Leaf", Some("public")), ("Bare", None)]);
    }
}
