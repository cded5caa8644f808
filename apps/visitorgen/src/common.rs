use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use visitorgen::marker::marker_artifact;
use visitorgen::{GeneratorConfig, MatchingMode};
use visitorgen_syntax::{Compilation, CompilationBuilder};

use crate::config::AppConfig;
use crate::discovery::find_sources;

/// Inputs shared by every command that runs a generation pass.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Source files or directories to scan
    #[arg(value_name = "PATH", default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Exclude patterns, added to the configured ones (glob syntax)
    #[arg(long, short = 'e', action = clap::ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Resolve marker attributes and base types through the binder
    #[arg(long)]
    pub semantic: bool,

    /// Process roots in parallel
    #[arg(long)]
    pub parallel: bool,
}

impl SourceArgs {
    /// Generator settings with this command's flags applied on top.
    #[must_use]
    pub fn generator_config(&self, config: &AppConfig) -> GeneratorConfig {
        let mut generator = config.generator.clone();
        if self.semantic {
            generator.matching = MatchingMode::Semantic;
        }
        if self.parallel {
            generator.parallel = true;
        }
        generator
    }

    /// Discovers and parses the sources, adding the marker declaration the
    /// way a host would after post-initialization.
    ///
    /// # Errors
    /// Fails on unreadable files and on sources that do not parse.
    pub fn load_compilation(
        &self,
        config: &AppConfig,
        output_dir: &Path,
    ) -> anyhow::Result<Compilation> {
        let exclude: Vec<String> = config
            .exclude
            .iter()
            .chain(&self.exclude)
            .cloned()
            .collect();
        let files = find_sources(&self.paths, &exclude, output_dir)?;
        if files.is_empty() {
            tracing::warn!("no source files found");
        }

        let mut builder = Compilation::builder();
        for file in &files {
            builder = add_file(builder, file)?;
        }
        let marker = marker_artifact(&config.generator.extension);
        builder = builder.source(marker.name, marker.text)?;
        tracing::info!(trees = builder.len(), "compilation loaded");
        Ok(builder.build())
    }
}

fn add_file(builder: CompilationBuilder, path: &Path) -> anyhow::Result<CompilationBuilder> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(builder.source(path, source)?)
}
