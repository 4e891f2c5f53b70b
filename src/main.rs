mod anchors;
mod commands;
mod config;
mod corpus;
mod diagnostics;
mod error;
mod links;
mod redirect;
mod rename;
mod report;
mod rewrite;
mod types;
mod validate;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "doclink",
    about = "Link integrity and filename harmonization for markdown documentation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate internal links and section anchors across the corpus
    Check {
        /// Retarget links whose missing file has exactly one basename match
        #[arg(long)]
        fix: bool,
        /// Emit the violation list as JSON on stdout
        #[arg(long)]
        json: bool,
        /// Write a markdown report to this path
        #[arg(long)]
        report: Option<PathBuf>,
        /// Path to the documentation root
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// Canonicalize filenames to kebab-case, updating references and
    /// leaving redirect stubs at the old paths
    Harmonize {
        /// Log intended changes without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Where to write the mapping report
        #[arg(long, default_value = "file-name-mapping-report.md")]
        report: PathBuf,
        /// Path to the documentation root
        #[arg(default_value = ".")]
        root: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { fix, json, report, root } => {
            commands::check(&root, fix, json, report.as_deref())
        },
        Commands::Harmonize { dry_run, report, root } => {
            commands::harmonize(&root, dry_run, &report)
        },
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    }
}
