//! Collects the declarations that implement a marked root.

use tokio_util::sync::CancellationToken;
use visitorgen_syntax::{BaseType, Compilation, SyntaxTree, TypeDecl};

use crate::config::MatchingMode;
use crate::error::Cancelled;
use crate::model::MarkedRoot;

/// A type declaration together with the tree it was found in.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'c> {
    pub tree: &'c SyntaxTree,
    pub decl: &'c TypeDecl,
}

/// Every class, struct and record in the compilation whose base list names
/// `root`, in tree order then source order. A declaration listing the root
/// twice is reported once. `file` types are skipped since their augmentation
/// would live in another file. Cancellation is checked before each tree.
pub fn walk<'c>(
    compilation: &'c Compilation,
    root: &MarkedRoot,
    mode: MatchingMode,
    cancel: &CancellationToken,
) -> Result<Vec<Candidate<'c>>, Cancelled> {
    let mut found = Vec::new();
    for tree in compilation.trees() {
        if cancel.is_cancelled() {
            tracing::debug!(root = %root.id, tree = %tree.path().display(), "cancellation observed");
            return Err(Cancelled);
        }
        for decl in tree.root().type_declarations() {
            if !decl.kind.is_implementor() {
                continue;
            }
            let matched = decl
                .base_list
                .iter()
                .any(|base| names_root(compilation, tree, decl, base, root, mode));
            if !matched {
                continue;
            }
            if decl.is_file_local() {
                tracing::warn!(
                    root = %root.id,
                    location = %tree.location(decl.name_span),
                    "skipping file-local implementing type"
                );
                continue;
            }
            found.push(Candidate { tree, decl });
        }
    }
    Ok(found)
}

fn names_root(
    compilation: &Compilation,
    tree: &SyntaxTree,
    decl: &TypeDecl,
    base: &BaseType,
    root: &MarkedRoot,
    mode: MatchingMode,
) -> bool {
    match mode {
        MatchingMode::Syntactic => base.simple_name() == Some(root.name.as_str()),
        MatchingMode::Semantic => {
            compilation
                .semantic_model()
                .resolve_base_type(tree.id(), decl, base)
                .as_ref()
                == Some(&root.id)
        }
    }
}
