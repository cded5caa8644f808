#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Visitor-pattern source generator.
//!
//! Finds interfaces marked `[VisitorNode]`, collects the classes, structs
//! and records implementing each one, and emits:
//!
//! - `<Type>.g.cs`: a `partial` re-opening of each implementing type with
//!   `Accept` methods for both dispatcher kinds;
//! - `<Root>Visitor.g.cs`: the root's `Accept` signatures plus the
//!   `<Root>Visitor<T>` and `<Root>Visitor` contracts.
//!
//! ```
//! use tokio_util::sync::CancellationToken;
//! use visitorgen::{Generator, GeneratorOutput, marker::MARKER_SOURCE};
//! use visitorgen_syntax::Compilation;
//!
//! let compilation = Compilation::builder()
//!     .source("VisitorNodeAttribute.g.cs", MARKER_SOURCE)
//!     .unwrap()
//!     .source(
//!         "Node.cs",
//!         "using VisitorGenerator; [VisitorNode] public partial interface INode {} public partial class Node : INode {}",
//!     )
//!     .unwrap()
//!     .build();
//!
//! let generator = Generator::default();
//! let mut output = GeneratorOutput::new();
//! let report = generator.run(&compilation, &CancellationToken::new(), &mut output);
//! assert!(!report.is_cancelled());
//! assert_eq!(output.names().collect::<Vec<_>>(), ["Node.g.cs", "INodeVisitor.g.cs"]);
//! ```

pub mod artifact;
pub mod config;
pub mod emit;
pub mod error;
pub mod marker;
pub mod model;
pub mod pipeline;

mod resolver;
mod scanner;
mod walker;

pub use artifact::{ArtifactSink, GeneratedArtifact, GeneratorOutput, HintNames};
pub use config::{GeneratorConfig, MatchingMode};
pub use error::ConfigError;
pub use pipeline::{Generator, PassOutcome, PassReport, RootReport, RootStatus};
