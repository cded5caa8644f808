//! The `[VisitorNode]` marker attribute.
//!
//! Its declaration is emitted once per generator, before any pass, so that
//! user code referencing `[VisitorNode]` compiles even when nothing is marked.

use visitorgen_syntax::SymbolId;

use crate::artifact::GeneratedArtifact;

pub const MARKER_NAMESPACE: &str = "VisitorGenerator";
pub const MARKER_NAME: &str = "VisitorNodeAttribute";

/// Artifact base name of the marker declaration.
pub const MARKER_HINT: &str = "VisitorNodeAttribute";

pub const MARKER_SOURCE: &str = r#"using System;
namespace VisitorGenerator
{
    [AttributeUsage(AttributeTargets.Interface, Inherited = false, AllowMultiple = false)]
    [System.Diagnostics.Conditional("VisitorSourceGenerator_DEBUG")]
    sealed class VisitorNodeAttribute : Attribute
    {
        public VisitorNodeAttribute()
        {
        }
    }
}
"#;

/// `VisitorGenerator.VisitorNodeAttribute`.
#[must_use]
pub fn marker_symbol() -> SymbolId {
    SymbolId::new(format!("{MARKER_NAMESPACE}.{MARKER_NAME}"))
}

#[must_use]
pub fn marker_artifact(extension: &str) -> GeneratedArtifact {
    GeneratedArtifact::new(format!("{MARKER_HINT}.g.{extension}"), MARKER_SOURCE)
}
