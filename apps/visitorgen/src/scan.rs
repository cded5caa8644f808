use clap::Args;
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use visitorgen::{GeneratedArtifact, Generator, PassReport, RootStatus};

use crate::common::SourceArgs;
use crate::config::AppConfig;

/// Lists marked roots and their implementing types without writing anything.
#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl ScanArgs {
    /// # Errors
    /// Fails when the sources cannot be loaded or the settings are invalid.
    pub fn run(&self, config: &AppConfig) -> anyhow::Result<()> {
        let generator = Generator::new(self.sources.generator_config(config))?;
        let compilation = self
            .sources
            .load_compilation(config, &config.output_dir)?;

        let mut discarded: Vec<GeneratedArtifact> = Vec::new();
        let report = generator.run(&compilation, &CancellationToken::new(), &mut discarded);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report.roots)?);
        } else {
            print_roots(&report);
        }
        Ok(())
    }
}

fn print_roots(report: &PassReport) {
    if report.roots.is_empty() {
        println!("No [VisitorNode] interfaces found.");
        return;
    }
    for root in &report.roots {
        let qualified = root
            .namespace
            .as_ref()
            .map_or_else(|| root.name.clone(), |ns| format!("{ns}.{}", root.name));
        println!("{}", qualified.bold());
        if root.status == RootStatus::EmptyHierarchy {
            println!("  {}", "(no implementing types)".yellow());
        }
        for name in &root.implementing_types {
            println!("  {name}");
        }
    }
}
