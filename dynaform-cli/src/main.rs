//! dynaform CLI - build and validate data-driven form controls.
//!
//! Commands:
//! - `dynaform build <file>`: show normalized descriptors and the control tree
//! - `dynaform validate <file> --values <file>`: assign values, report errors
//! - `dynaform property <file> <name>`: show one control's property bag
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error
//! - 2: Form is invalid (`validate` only)

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};
use config::ConfigProvider;

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("dynaform=debug,dynaform_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match dispatch_command(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    };
    std::process::exit(exit_code);
}

/// Load configuration, apply CLI overrides, and run the subcommand.
fn dispatch_command(cli: Cli) -> anyhow::Result<i32> {
    let cwd = std::env::current_dir()?;
    let mut config = ConfigProvider::new(cwd).load()?;
    if let Some(output) = cli.output {
        config.output = output;
    }

    match cli.command {
        Commands::Build { file } => commands::run_build(&file, &config),
        Commands::Validate { file, values } => commands::run_validate(&file, &values, &config),
        Commands::Property { file, name } => commands::run_property(&file, &name, &config),
    }
}
