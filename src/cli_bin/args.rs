//! Command-line argument definitions and parsing

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser)]
#[command(
    name = "mattershift",
    version,
    about = "Batch-apply ordered transformations to YAML front matter in markdown files",
    long_about = "mattershift applies a declarative, ordered list of key-level operations \
                  (add, delete, rename, nest, unnest, ...) to the front matter of every \
                  markdown file under a directory, rewriting files in place and reporting \
                  the files it skipped or could not process."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Apply an operation list to every markdown file under a directory
    Apply(ApplyArgs),
    /// Decode an operation list and print it in record form
    Check(CheckArgs),
}

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Directory to process recursively
    pub root: PathBuf,

    /// Operation list file (YAML, or JSON when it ends in .json)
    #[arg(short, long, value_name = "FILE")]
    pub ops: PathBuf,

    /// Text encoding of the documents
    #[arg(short, long, value_name = "LABEL", default_value = "utf-8")]
    pub encoding: String,

    /// Only process files with these extensions (default: md)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Follow symbolic links when walking
    #[arg(long)]
    pub follow_links: bool,

    /// Maximum depth for directory recursion
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Run every step except writing files back
    #[arg(long)]
    pub dry_run: bool,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Operation list file (YAML, or JSON when it ends in .json)
    #[arg(short, long, value_name = "FILE")]
    pub ops: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "yaml")]
    pub format: OperationFormat,
}

/// Output formats for the batch report
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable summary
    Text,
    /// JSON report
    Json,
}

/// Output formats for a decoded operation list
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationFormat {
    /// YAML record list
    Yaml,
    /// JSON record list
    Json,
}
