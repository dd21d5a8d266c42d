//! stanza-lint CLI tool.
//!
//! Usage:
//! ```bash
//! stanza-lint check [OPTIONS] [PATH]
//! stanza-lint check --fix [PATH]
//! stanza-lint list-rules
//! stanza-lint list-groups
//! stanza-lint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

use config_resolver::ConfigLocator;

/// Stanza spacing linter for cask definitions
#[derive(Parser)]
#[command(name = "stanza-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "STANZA_LINT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run lint checks
    Check {
        /// File or directory to analyze (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Apply automatic fixes and report what remains
        #[arg(long)]
        fix: bool,

        /// Only run specific rules (comma-separated)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List available rules
    ListRules,

    /// List stanza groups and conditional blocks
    ListGroups,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
    /// Annotated source snippets.
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            fix,
            rules,
            exclude,
        } => {
            let source = ConfigLocator::new(cli.config.as_deref()).locate(&path);
            let options = commands::check::CheckOptions {
                format,
                fix,
                rules,
                exclude,
            };
            commands::check::run(&path, &options, &source)
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::ListGroups => {
            let source = ConfigLocator::new(cli.config.as_deref()).locate(Path::new("."));
            commands::list_groups::run(&source)
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
