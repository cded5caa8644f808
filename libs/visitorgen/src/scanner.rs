//! Finds `[VisitorNode]` interfaces.

use std::collections::{HashMap, HashSet};

use tokio_util::sync::CancellationToken;
use visitorgen_syntax::{Compilation, SymbolId, TypeKind};

use crate::error::Cancelled;
use crate::model::MarkedRoot;
use crate::resolver::Resolver;

/// Distinct marked roots in first-seen order across trees.
///
/// An interface qualifies when one of its attributes binds to `marker`; an
/// unrelated attribute that merely shares the name does not. Declarations
/// the semantic model cannot place are dropped. Accessibility is taken from
/// the first fragment of the interface that declares one.
pub fn scan(
    compilation: &Compilation,
    marker: &SymbolId,
    cancel: &CancellationToken,
) -> Result<Vec<MarkedRoot>, Cancelled> {
    let model = compilation.semantic_model();
    let resolver = Resolver::new(compilation);
    let mut seen = HashSet::new();
    let mut declared_access: HashMap<SymbolId, String> = HashMap::new();
    let mut roots = Vec::new();

    for tree in compilation.trees() {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }
        for decl in tree.root().type_declarations() {
            if decl.kind != TypeKind::Interface {
                continue;
            }
            if let Some(access) = decl.accessibility()
                && let Some(symbol) = model.declared_symbol(tree.id(), decl)
            {
                declared_access.entry(symbol.id).or_insert(access);
            }
            let marked = decl
                .all_attributes()
                .any(|attr| model.resolve_attribute(tree.id(), decl, attr).as_ref() == Some(marker));
            if !marked {
                continue;
            }
            if decl.is_file_local() {
                tracing::warn!(
                    location = %tree.location(decl.name_span),
                    "skipping file-local marked interface"
                );
                continue;
            }
            let Some(root) = resolver.resolve_root(tree, decl) else {
                continue;
            };
            if seen.insert(root.id.clone()) {
                tracing::debug!(root = %root.id, location = %root.location, "found marked root");
                roots.push(root);
            } else {
                tracing::trace!(root = %root.id, location = %root.location, "merged partial root fragment");
            }
        }
    }

    // Any fragment may carry the modifier, marked or not.
    for root in &mut roots {
        if root.accessibility.is_none() {
            root.accessibility = declared_access.remove(&root.id);
        }
    }
    Ok(roots)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::marker::{MARKER_SOURCE, marker_symbol};

    fn compilation(sources: &[&str]) -> Compilation {
        let mut builder = Compilation::builder()
            .source("VisitorNodeAttribute.g.cs", MARKER_SOURCE)
            .unwrap();
        for (idx, src) in sources.iter().enumerate() {
            builder = builder.source(format!("f{idx}.cs"), *src).unwrap();
        }
        builder.build()
    }

    fn names(roots: &[MarkedRoot]) -> Vec<&str> {
        roots.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn finds_marked_interfaces_in_tree_order() {
        let c = compilation(&[
            "using VisitorGenerator; [VisitorNode] interface IB {}",
            "namespace N { [VisitorGenerator.VisitorNode] public interface IA {} interface IPlain {} }",
        ]);
        let roots = scan(&c, &marker_symbol(), &CancellationToken::new()).unwrap();
        assert_eq!(names(&roots), vec!["IB", "N.IA"]);
        assert_eq!(roots[1].accessibility.as_deref(), Some("public"));
    }

    #[test]
    fn partial_fragments_collapse_to_first() {
        let c = compilation(&[
            "using VisitorGenerator; namespace N { [VisitorNode] partial interface IShape {} }",
            "using VisitorGenerator; namespace N { [VisitorNode] partial interface IShape {} }",
        ]);
        let roots = scan(&c, &marker_symbol(), &CancellationToken::new()).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].location.path.to_string_lossy(), "f0.cs");
    }

    #[test]
    fn accessibility_comes_from_any_fragment() {
        let c = compilation(&[
            "using VisitorGenerator; namespace N { [VisitorNode] partial interface IShape {} }",
            "namespace N { public partial interface IShape {} }",
        ]);
        let roots = scan(&c, &marker_symbol(), &CancellationToken::new()).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].location.path.to_string_lossy(), "f0.cs");
        assert_eq!(roots[0].accessibility.as_deref(), Some("public"));
    }

    #[test]
    fn ignores_classes_and_lookalike_attributes() {
        let c = compilation(&[
            "namespace Fake { class VisitorNodeAttribute : System.Attribute {} [VisitorNode] interface IFake {} }",
            "using VisitorGenerator; [VisitorNode] class NotAnInterface {}",
        ]);
        let roots = scan(&c, &marker_symbol(), &CancellationToken::new()).unwrap();
        assert!(roots.is_empty());
    }

    #[test]
    fn file_local_interfaces_are_not_roots() {
        let c = compilation(&["using VisitorGenerator; [VisitorNode] file interface IHidden {}"]);
        let roots = scan(&c, &marker_symbol(), &CancellationToken::new()).unwrap();
        assert!(roots.is_empty());
    }

    #[test]
    fn observes_cancellation() {
        let c = compilation(&["using VisitorGenerator; [VisitorNode] interface I {}"]);
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(scan(&c, &marker_symbol(), &token), Err(Cancelled));
    }
}
