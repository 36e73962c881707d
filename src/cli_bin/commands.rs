//! CLI command handlers that bridge CLI arguments to library operations

use crate::cli_bin::args::*;
use log::debug;
use mattershift::{BatchConfig, BatchDriver, BatchReport, OperationSet, Result, TextEncoding};
use std::process::ExitCode;

/// Execute the apply command
///
/// Exits with 1 when any file failed; the batch itself always runs to the end.
pub fn apply_command(args: ApplyArgs) -> Result<ExitCode> {
    debug!("Executing apply command with args: {:?}", args);

    let operations = OperationSet::from_file(&args.ops)?;
    let encoding = TextEncoding::from_label(&args.encoding)?;

    let mut config = BatchConfig::default()
        .with_encoding(encoding)
        .with_follow_links(args.follow_links)
        .with_max_depth(args.max_depth)
        .with_dry_run(args.dry_run);
    if !args.extensions.is_empty() {
        config = config.with_extensions(args.extensions);
    }

    let report = BatchDriver::new(config).run(&args.root, &operations);

    match args.format {
        ReportFormat::Text => print_report(&report, args.dry_run),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(if report.has_errors() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

/// Execute the check command
pub fn check_command(args: CheckArgs) -> Result<ExitCode> {
    debug!("Executing check command with args: {:?}", args);

    let operations = OperationSet::from_file(&args.ops)?;
    match args.format {
        OperationFormat::Yaml => print!("{}", operations.to_yaml_string()?),
        OperationFormat::Json => println!("{}", operations.to_json_string()?),
    }
    Ok(ExitCode::SUCCESS)
}

fn print_report(report: &BatchReport, dry_run: bool) {
    if dry_run {
        println!("Dry run: {} file(s) would be modified.", report.modified.len());
    } else {
        println!("Modification completed.");
    }

    if !report.errors.is_empty() {
        println!("Errors occurred in the following files:");
        for failure in &report.errors {
            println!(
                "  [{}] {}: {}",
                failure.category,
                failure.path.display(),
                failure.message
            );
        }
    }

    if !report.skipped.is_empty() {
        println!("The following files were skipped (no valid frontmatter block found):");
        for path in &report.skipped {
            println!("  {}", path.display());
        }
    }
}
