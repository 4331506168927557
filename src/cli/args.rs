//! Command-line arguments and subcommands for the `compare-ast` CLI.
//!
//! Uses the `clap` derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "compare-ast",
    version,
    about = "Compare JavaScript syntax trees modulo placeholders and equivalent member access."
)]
pub struct CompareAstArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that a generated program matches a template.
    Compare {
        /// The generated (actual) program.
        #[arg(required = true)]
        actual: PathBuf,
        /// The template (expected) program.
        #[arg(required = true)]
        expected: PathBuf,
        /// Regex marking identifier placeholders in the template.
        #[arg(long, value_name = "REGEX")]
        var_pattern: Option<String>,
        /// Regex marking string-literal placeholders in the template.
        #[arg(long, value_name = "REGEX")]
        string_pattern: Option<String>,
        /// YAML file with `var_pattern` / `string_pattern`; flags override it.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Treat both inputs as ESTree JSON instead of source text.
        #[arg(long)]
        json: bool,
    },
    /// Print the ESTree JSON for a program.
    Ast {
        #[arg(required = true)]
        file: PathBuf,
        /// Rewrite dot access into bracket form first.
        #[arg(long)]
        normalize: bool,
    },
    /// Discover and run YAML comparison suites in a directory.
    Test {
        #[arg(default_value = "tests/suites")]
        path: PathBuf,
        /// Only run cases whose name contains this text.
        #[arg(long)]
        filter: Option<String>,
        /// Print the comparison error for failing cases.
        #[arg(short, long)]
        verbose: bool,
    },
}
