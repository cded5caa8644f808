#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Declaration-level view of C# sources.
//!
//! Parses files into [`ast::CompilationUnit`] trees holding `using`
//! directives, namespaces and type headers, groups them in a [`Compilation`],
//! and answers symbol questions through a [`SemanticModel`].
//!
//! ```
//! use visitorgen_syntax::{Compilation, SemanticModel};
//!
//! let compilation = Compilation::builder()
//!     .source("Shapes.cs", "namespace Shapes { public interface IShape {} public class Circle : IShape {} }")
//!     .unwrap()
//!     .build();
//! let tree = &compilation.trees()[0];
//! let circle = tree.root().type_declarations()[1];
//! let base = compilation
//!     .semantic_model()
//!     .resolve_base_type(tree.id(), circle, &circle.base_list[0]);
//! assert_eq!(base.unwrap().as_str(), "Shapes.IShape");
//! ```

pub mod ast;
pub mod compilation;
pub mod error;
pub mod semantic;
pub mod span;
pub mod token;

mod lexer;
mod parser;

pub use ast::{
    Attribute, AttributeList, BaseType, CompilationUnit, Member, NamespaceDecl, TypeDecl,
    TypeKind, UsingDirective, UsingKind,
};
pub use compilation::{Compilation, CompilationBuilder, SyntaxTree, TreeId};
pub use error::ParseError;
pub use semantic::{DeclarationTable, Namespace, SemanticModel, Symbol, SymbolId};
pub use span::{Location, Span};
