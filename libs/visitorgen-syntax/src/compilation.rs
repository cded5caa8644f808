//! Parsed sources grouped into one compilation snapshot.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::ast::CompilationUnit;
use crate::error::{ParseError, RawError};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::semantic::{DeclarationTable, SemanticModel};
use crate::span::{Location, Span};

/// Position of a tree inside its compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TreeId(pub usize);

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One parsed source file.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    id: TreeId,
    path: PathBuf,
    source: String,
    root: CompilationUnit,
}

impl SyntaxTree {
    /// Lex and parse `source`. The tree gets its final id when added to a
    /// [`Compilation`].
    ///
    /// # Errors
    /// Returns [`ParseError`] located at the first token the parser could not accept.
    pub fn parse(path: impl Into<PathBuf>, source: impl Into<String>) -> Result<Self, ParseError> {
        let path = path.into();
        let source = source.into();
        let root = Lexer::new(&source)
            .tokenize()
            .and_then(|tokens| Parser::new(&source, tokens).parse_compilation_unit())
            .map_err(|RawError { message, span }| {
                let location = Location::from_offset(&path, &source, span.start);
                ParseError::new(message, span, location)
            })?;

        tracing::trace!(path = %path.display(), types = root.type_declarations().len(), "parsed syntax tree");
        Ok(Self {
            id: TreeId::default(),
            path,
            source,
            root,
        })
    }

    #[must_use]
    pub fn id(&self) -> TreeId {
        self.id
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn root(&self) -> &CompilationUnit {
        &self.root
    }

    #[must_use]
    pub fn location(&self, span: Span) -> Location {
        Location::from_offset(&self.path, &self.source, span.start)
    }
}

/// Ordered trees plus the semantic service answering questions about them.
#[derive(Clone)]
pub struct Compilation {
    trees: Vec<SyntaxTree>,
    model: Arc<dyn SemanticModel>,
}

impl Compilation {
    #[must_use]
    pub fn builder() -> CompilationBuilder {
        CompilationBuilder::default()
    }

    /// Compilation bound through a [`DeclarationTable`] built from `trees`.
    #[must_use]
    pub fn new(trees: Vec<SyntaxTree>) -> Self {
        let trees = number_trees(trees);
        let model = Arc::new(DeclarationTable::build(&trees));
        Self { trees, model }
    }

    /// Compilation answering semantic queries through a host-provided model.
    #[must_use]
    pub fn with_semantic_model(trees: Vec<SyntaxTree>, model: Arc<dyn SemanticModel>) -> Self {
        Self {
            trees: number_trees(trees),
            model,
        }
    }

    #[must_use]
    pub fn trees(&self) -> &[SyntaxTree] {
        &self.trees
    }

    #[must_use]
    pub fn tree(&self, id: TreeId) -> Option<&SyntaxTree> {
        self.trees.get(id.0)
    }

    #[must_use]
    pub fn semantic_model(&self) -> &dyn SemanticModel {
        self.model.as_ref()
    }
}

impl fmt::Debug for Compilation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compilation")
            .field("trees", &self.trees.len())
            .finish_non_exhaustive()
    }
}

fn number_trees(mut trees: Vec<SyntaxTree>) -> Vec<SyntaxTree> {
    for (idx, tree) in trees.iter_mut().enumerate() {
        tree.id = TreeId(idx);
    }
    trees
}

/// Collects trees in the order they will be visited.
#[derive(Debug, Default)]
pub struct CompilationBuilder {
    trees: Vec<SyntaxTree>,
}

impl CompilationBuilder {
    #[must_use]
    pub fn tree(mut self, tree: SyntaxTree) -> Self {
        self.trees.push(tree);
        self
    }

    /// Parse and append one source.
    ///
    /// # Errors
    /// Propagates the [`ParseError`] of `source`.
    pub fn source(
        self,
        path: impl Into<PathBuf>,
        source: impl Into<String>,
    ) -> Result<Self, ParseError> {
        Ok(self.tree(SyntaxTree::parse(path, source)?))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    #[must_use]
    pub fn build(self) -> Compilation {
        Compilation::new(self.trees)
    }

    #[must_use]
    pub fn build_with_model(self, model: Arc<dyn SemanticModel>) -> Compilation {
        Compilation::with_semantic_model(self.trees, model)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn trees_are_numbered_in_insertion_order() {
        let compilation = Compilation::builder()
            .source("a.cs", "class A {}")
            .unwrap()
            .source("b.cs", "class B {}")
            .unwrap()
            .build();
        let ids: Vec<_> = compilation.trees().iter().map(SyntaxTree::id).collect();
        assert_eq!(ids, vec![TreeId(0), TreeId(1)]);
        assert_eq!(compilation.tree(TreeId(1)).unwrap().path(), Path::new("b.cs"));
        assert_eq!(compilation.tree(TreeId(1)).unwrap().source(), "class B {}");
    }

    #[test]
    fn parse_errors_carry_file_locations() {
        let err = SyntaxTree::parse("bad.cs", "namespace A\n{\n    class {}\n}\n").unwrap_err();
        assert_eq!(err.location.line, 3);
        assert_eq!(err.location.column, 11);
        assert!(err.to_string().starts_with("bad.cs:3:11:"), "{err}");
    }
}
