use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;

mod cli_bin;

use cli_bin::args::{Cli, Commands};
use cli_bin::commands::{apply_command, check_command};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Apply(args) => {
            let ops = args.ops.display().to_string();
            apply_command(args).with_context(|| format!("apply failed (operations: {ops})"))
        }
        Commands::Check(args) => {
            let ops = args.ops.display().to_string();
            check_command(args).with_context(|| format!("cannot load operations from {ops}"))
        }
    }
}
