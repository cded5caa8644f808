use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use visitorgen::{Generator, GeneratorOutput, PassReport, RootStatus};

use crate::common::SourceArgs;
use crate::config::AppConfig;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Output directory (overrides `output_dir` from the config)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Remove previously generated files from the output directory first
    #[arg(long)]
    pub clean: bool,

    /// Print the pass report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    /// # Errors
    /// Fails when the sources cannot be loaded, the generator settings are
    /// invalid, or the output cannot be written.
    pub fn run(&self, config: &AppConfig) -> anyhow::Result<()> {
        let output_dir = self.output.as_deref().unwrap_or(&config.output_dir);
        let generator = Generator::new(self.sources.generator_config(config))?;
        let compilation = self.sources.load_compilation(config, output_dir)?;

        let mut output = GeneratorOutput::new();
        generator.post_initialization(&mut output);
        let report = generator.run(&compilation, &CancellationToken::new(), &mut output);

        fs::create_dir_all(output_dir)
            .with_context(|| format!("failed to create {}", output_dir.display()))?;
        if self.clean {
            clean_output_dir(output_dir, &generator.config().extension)?;
        }
        for artifact in &output {
            let path = output_dir.join(&artifact.name);
            fs::write(&path, &artifact.text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::debug!(path = %path.display(), "artifact written");
        }

        if self.json {
            print_json_report(&report, output_dir)?;
        } else {
            print_summary(&report, output.len(), output_dir);
        }
        Ok(())
    }
}

/// Deletes `*.g.<extension>` files directly under `dir`.
fn clean_output_dir(dir: &Path, extension: &str) -> anyhow::Result<()> {
    let suffix = format!(".g.{extension}");
    for entry in fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let path = entry?.path();
        let generated = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with(&suffix));
        if generated && path.is_file() {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
            tracing::debug!(path = %path.display(), "stale artifact removed");
        }
    }
    Ok(())
}

fn print_json_report(report: &PassReport, output_dir: &Path) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "output_dir": output_dir,
        "report": report,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_summary(report: &PassReport, written: usize, output_dir: &Path) {
    println!("{}", "=".repeat(80));
    println!("  {}", "VISITOR GENERATOR".bold());
    println!("{}", "=".repeat(80));
    for root in &report.roots {
        match root.status {
            RootStatus::Emitted => println!(
                "  {} {} ({} types)",
                "ok".green(),
                root.name,
                root.implementing_types.len()
            ),
            RootStatus::EmptyHierarchy => println!(
                "  {} {} (no implementing types, skipped)",
                "--".yellow(),
                root.name
            ),
        }
    }
    if report.roots.is_empty() {
        println!("  No [VisitorNode] interfaces found.");
    }
    println!();
    println!("  Files written: {written} -> {}", output_dir.display());
}
