//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::checker::CheckMode;

/// tfplan-assert - Assert expected resources against a Terraform plan.
#[derive(Parser, Debug)]
#[command(name = "tfplan-assert")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the expectations file.
    #[arg(short, long, global = true, env = "TFPLAN_ASSERT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a template expectations file.
    Init {
        /// Directory to initialize (defaults to current directory).
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Force overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the expectations file.
    Validate {
        /// Show all warnings, not just errors.
        #[arg(short, long)]
        warnings: bool,
    },

    /// Check the expected resources against a plan.
    Check {
        /// Plan JSON file (overrides `plan.path`).
        #[arg(short, long)]
        plan: Option<PathBuf>,

        /// Comparison mode (overrides `mode`).
        #[arg(short, long)]
        mode: Option<CheckMode>,

        /// Maximum module nesting depth (overrides `plan.max_depth`).
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Show the flattened resource index of a plan.
    Show {
        /// Plan JSON file (overrides `plan.path`).
        #[arg(short, long)]
        plan: Option<PathBuf>,
    },

    /// Count the resources of the module selected by a path expression.
    Count {
        /// Path expression, e.g. `.planned_values.root_module`.
        expression: String,

        /// Plan JSON file (overrides `plan.path`).
        #[arg(short, long)]
        plan: Option<PathBuf>,
    },

    /// Print the sub-document selected by a path expression.
    Query {
        /// Path expression, e.g. `.planned_values.root_module.resources[0]`.
        expression: String,

        /// Plan JSON file (overrides `plan.path`).
        #[arg(short, long)]
        plan: Option<PathBuf>,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl OutputFormat {
    /// Returns true for JSON output.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_overrides() {
        let cli = Cli::try_parse_from([
            "tfplan-assert",
            "--output",
            "json",
            "check",
            "--plan",
            "plan.json",
            "--mode",
            "equal",
            "--max-depth",
            "4",
        ])
        .unwrap();

        assert!(cli.output.is_json());
        match cli.command {
            Commands::Check {
                plan,
                mode,
                max_depth,
            } => {
                assert_eq!(plan, Some(PathBuf::from("plan.json")));
                assert_eq!(mode, Some(CheckMode::Equal));
                assert_eq!(max_depth, Some(4));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_query() {
        let cli = Cli::try_parse_from([
            "tfplan-assert",
            "query",
            ".planned_values.root_module",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Query { ref expression, plan: None } if expression == ".planned_values.root_module"
        ));
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
