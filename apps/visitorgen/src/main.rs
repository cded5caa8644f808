//! `visitorgen`: generate visitor-pattern plumbing for C# sources.
//!
//! # Usage
//!
//! ```bash
//! # Generate into ./generated
//! visitorgen generate src
//!
//! # Custom output directory, stale files removed first
//! visitorgen generate --clean -o obj/visitors src
//!
//! # List roots and their implementing types
//! visitorgen scan --json src
//! ```

// CLI tools are expected to print to stdout/stderr
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod common;
mod config;
mod discovery;
mod generate;
mod logging;
mod marker;
mod scan;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// Visitor-pattern source generator for C#
#[derive(Parser)]
#[command(name = "visitorgen")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a generation pass and write the artifacts
    Generate(generate::GenerateArgs),
    /// Report marked roots and implementing types
    Scan(scan::ScanArgs),
    /// Print the marker attribute source
    Marker,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (VISITORGEN__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.verbose);

    logging::init(&config.logging);

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    match cli.command {
        Some(Commands::Generate(args)) => args.run(&config),
        Some(Commands::Scan(args)) => args.run(&config),
        Some(Commands::Marker) => {
            marker::run();
            Ok(())
        }
        None => anyhow::bail!("no command given, see `visitorgen --help`"),
    }
}
