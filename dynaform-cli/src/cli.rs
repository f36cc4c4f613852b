//! CLI definition for the dynaform command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::OutputFormat;

/// dynaform - build form controls from declarative field descriptors
#[derive(Parser, Debug)]
#[command(name = "dynaform")]
#[command(version)]
#[command(about = "Build and validate data-driven form controls")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Output format (overrides configuration)
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize a descriptor file and show the resulting controls
    Build {
        /// Descriptor file (.json, .yaml or .yml)
        file: PathBuf,
    },
    /// Build the controls, assign values and report validation errors
    Validate {
        /// Descriptor file (.json, .yaml or .yml)
        file: PathBuf,
        /// File holding an object of control name -> value
        #[arg(long)]
        values: PathBuf,
    },
    /// Show the resolved property bag of one control
    Property {
        /// Descriptor file (.json, .yaml or .yml)
        file: PathBuf,
        /// Control name, matched case-insensitively
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_validate_with_global_flags() {
        let cli = Cli::parse_from([
            "dynaform", "validate", "form.json", "--values", "values.json", "-o", "yaml", "-d",
        ]);
        assert!(cli.debug);
        assert_eq!(cli.output, Some(OutputFormat::Yaml));
        match cli.command {
            Commands::Validate { file, values } => {
                assert_eq!(file, PathBuf::from("form.json"));
                assert_eq!(values, PathBuf::from("values.json"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
