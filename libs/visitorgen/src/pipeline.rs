//! Generation pass orchestration.

use rayon::prelude::*;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use visitorgen_syntax::Compilation;

use crate::artifact::{ArtifactSink, GeneratedArtifact, HintNames};
use crate::config::GeneratorConfig;
use crate::emit::{self, PendingArtifact};
use crate::error::{Cancelled, ConfigError};
use crate::marker::{self, MARKER_HINT};
use crate::model::MarkedRoot;
use crate::resolver::Resolver;
use crate::{scanner, walker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassOutcome {
    Completed,
    /// Cancellation was observed. Artifacts handed over before that stand.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RootStatus {
    Emitted,
    /// No implementing types; nothing was generated for this root.
    EmptyHierarchy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootReport {
    pub name: String,
    /// `None` for the global namespace.
    pub namespace: Option<String>,
    pub implementing_types: Vec<String>,
    pub status: RootStatus,
    pub artifacts: Vec<String>,
}

/// What one pass did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub outcome: PassOutcome,
    pub roots: Vec<RootReport>,
    /// Artifact names in the order they reached the sink.
    pub artifacts_emitted: Vec<String>,
}

impl Default for PassReport {
    fn default() -> Self {
        Self {
            outcome: PassOutcome::Completed,
            roots: Vec::new(),
            artifacts_emitted: Vec::new(),
        }
    }
}

impl PassReport {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.outcome == PassOutcome::Cancelled
    }
}

/// Output of one root before names are assigned.
struct RootWork {
    report: RootReport,
    pending: Vec<PendingArtifact>,
}

/// Visitor-pattern generator. Holds no state between passes.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// # Errors
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Contributes the marker declaration. Independent of any compilation.
    pub fn post_initialization(&self, sink: &mut dyn ArtifactSink) {
        sink.add_source(marker::marker_artifact(&self.config.extension));
    }

    /// Runs one pass over `compilation`.
    ///
    /// Roots are processed in discovery order, or in parallel when configured;
    /// either way their artifacts reach `sink` in discovery order. In parallel
    /// mode results are handed over after all roots finish, and the token is
    /// checked again before each root is committed. A root with no
    /// implementing types is skipped. Once cancellation is observed nothing
    /// further is added.
    pub fn run(
        &self,
        compilation: &Compilation,
        cancel: &CancellationToken,
        sink: &mut dyn ArtifactSink,
    ) -> PassReport {
        let span = tracing::debug_span!(
            "generation_pass",
            trees = compilation.trees().len(),
            parallel = self.config.parallel
        );
        let _guard = span.enter();

        let mut report = PassReport::default();
        let roots = match scanner::scan(compilation, &marker::marker_symbol(), cancel) {
            Ok(roots) => roots,
            Err(Cancelled) => {
                report.outcome = PassOutcome::Cancelled;
                tracing::info!("generation pass cancelled during scan");
                return report;
            }
        };

        let mut names = HintNames::new(self.config.extension.clone());
        names.reserve(MARKER_HINT);

        if self.config.parallel {
            let results: Vec<Result<RootWork, Cancelled>> = roots
                .par_iter()
                .map(|root| self.process_root(compilation, root, cancel))
                .collect();
            for result in results {
                if !Self::commit(result, cancel, &mut names, sink, &mut report) {
                    break;
                }
            }
        } else {
            for root in &roots {
                let result = self.process_root(compilation, root, cancel);
                if !Self::commit(result, cancel, &mut names, sink, &mut report) {
                    break;
                }
            }
        }

        let skipped = report
            .roots
            .iter()
            .filter(|r| r.status == RootStatus::EmptyHierarchy)
            .count();
        tracing::info!(
            outcome = ?report.outcome,
            roots = report.roots.len(),
            skipped,
            artifacts = report.artifacts_emitted.len(),
            "generation pass finished"
        );
        report
    }

    fn process_root(
        &self,
        compilation: &Compilation,
        root: &MarkedRoot,
        cancel: &CancellationToken,
    ) -> Result<RootWork, Cancelled> {
        let candidates = walker::walk(compilation, root, self.config.matching, cancel)?;
        let hierarchy = Resolver::new(compilation).resolve_hierarchy(root.clone(), &candidates);

        let mut report = RootReport {
            name: root.name.clone(),
            namespace: root.namespace.name().map(str::to_owned),
            implementing_types: hierarchy.types.iter().map(|t| t.name.clone()).collect(),
            status: RootStatus::Emitted,
            artifacts: Vec::new(),
        };

        if hierarchy.types.is_empty() {
            tracing::warn!(
                root = %root.id,
                location = %root.location,
                "no implementing types found, skipping root"
            );
            report.status = RootStatus::EmptyHierarchy;
            return Ok(RootWork {
                report,
                pending: Vec::new(),
            });
        }

        for ty in hierarchy.less_accessible_types() {
            tracing::warn!(
                root = %root.id,
                ty = %ty.id,
                location = %ty.location,
                "implementing type is less accessible than the public visitor contracts"
            );
        }

        tracing::debug!(
            root = %root.id,
            types = hierarchy.types.len(),
            usings = hierarchy.usings.len(),
            "emitting hierarchy"
        );
        Ok(RootWork {
            report,
            pending: emit::emit_hierarchy(&hierarchy),
        })
    }

    /// Names and hands over one root's artifacts. Returns `false` once
    /// cancellation has been recorded. A root finished before the token was
    /// cancelled is still dropped if the cancellation is seen first here.
    fn commit(
        result: Result<RootWork, Cancelled>,
        cancel: &CancellationToken,
        names: &mut HintNames,
        sink: &mut dyn ArtifactSink,
        report: &mut PassReport,
    ) -> bool {
        let work = if cancel.is_cancelled() {
            Err(Cancelled)
        } else {
            result
        };
        let Ok(RootWork {
            report: mut root_report,
            pending,
        }) = work
        else {
            report.outcome = PassOutcome::Cancelled;
            return false;
        };

        for artifact in pending {
            let name = names.claim(&artifact.candidates);
            root_report.artifacts.push(name.clone());
            report.artifacts_emitted.push(name.clone());
            sink.add_source(GeneratedArtifact::new(name, artifact.text));
        }
        report.roots.push(root_report);
        true
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_config() {
        let config = GeneratorConfig {
            extension: "g.cs".to_owned(),
            ..GeneratorConfig::default()
        };
        assert!(Generator::new(config).is_err());
    }

    #[test]
    fn post_initialization_emits_marker_once() {
        let generator = Generator::default();
        let mut sink: Vec<GeneratedArtifact> = Vec::new();
        generator.post_initialization(&mut sink);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].name, "VisitorNodeAttribute.g.cs");
        assert_eq!(sink[0].text, marker::MARKER_SOURCE);
    }

    #[test]
    fn empty_compilation_completes_without_artifacts() {
        let generator = Generator::default();
        let mut sink: Vec<GeneratedArtifact> = Vec::new();
        let report = generator.run(
            &Compilation::new(Vec::new()),
            &CancellationToken::new(),
            &mut sink,
        );
        assert_eq!(report.outcome, PassOutcome::Completed);
        assert!(report.roots.is_empty());
        assert!(sink.is_empty());
    }
}
