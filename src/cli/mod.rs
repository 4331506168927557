//! The `compare-ast` command-line interface.
//!
//! Exit status of `compare` is the error kind code (1 parse, 2 rebinding,
//! 3 mismatch), 0 when the programs are equivalent, and 64 when the inputs
//! or configuration could not be loaded.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use termcolor::{ColorChoice, StandardStream};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::ast::Value;
use crate::cli::args::{Command, CompareAstArgs};
use crate::errors::{CompareError, OptionsError, Side};
use crate::normalize::normalize_tree;
use crate::options::OptionsFile;
use crate::test_harness::{run_all_tests, TestConfig};
use crate::{compare_json, compare_source, syntax};

pub mod args;
pub mod output;

/// Exit status for unreadable inputs or bad configuration (`EX_USAGE`).
pub const EXIT_USAGE: i32 = 64;

/// Failures that happen before or around a comparison.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path} is not valid JSON")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error(transparent)]
    Compare(#[from] CompareError),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Compare(e) => e.code(),
            _ => EXIT_USAGE,
        }
    }
}

/// The main entry point for the CLI.
pub fn run() {
    init_tracing();
    let args = CompareAstArgs::parse();

    let result = match args.command {
        Command::Compare {
            actual,
            expected,
            var_pattern,
            string_pattern,
            config,
            json,
        } => {
            let flags = OptionsFile {
                var_pattern,
                string_pattern,
            };
            handle_compare(&actual, &expected, flags, config.as_deref(), json)
        }
        Command::Ast { file, normalize } => handle_ast(&file, normalize),
        Command::Test {
            path,
            filter,
            verbose,
        } => {
            let config = TestConfig {
                verbose,
                ..TestConfig::default()
            };
            let summary = run_all_tests(&path, filter.as_deref(), &config);
            process::exit(if summary.failed > 0 { 1 } else { 0 });
        }
    };

    if let Err(e) = result {
        report(&e);
        process::exit(e.exit_code());
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn report(error: &CliError) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let written = match error {
        CliError::Compare(e) => output::write_failure(&mut stderr, e),
        other => write_error_chain(&mut stderr, other),
    };
    if written.is_err() {
        eprintln!("Error: {}", error);
    }
}

fn write_error_chain(out: &mut dyn Write, error: &dyn std::error::Error) -> io::Result<()> {
    writeln!(out, "Error: {}", error)?;
    let mut cause = error.source();
    while let Some(e) = cause {
        writeln!(out, "  caused by: {}", e)?;
        cause = e.source();
    }
    Ok(())
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

/// Handles the `compare` subcommand.
pub fn handle_compare(
    actual: &Path,
    expected: &Path,
    flags: OptionsFile,
    config: Option<&Path>,
    json: bool,
) -> Result<(), CliError> {
    let settings = match config {
        Some(path) => OptionsFile::load(path)?.merge(flags),
        None => flags,
    };
    let options = settings.compile()?;

    let actual_text = read(actual)?;
    let expected_text = read(expected)?;

    if json {
        let actual_json = parse_json(actual, &actual_text)?;
        let expected_json = parse_json(expected, &expected_text)?;
        compare_json(&actual_json, &expected_json, &options)?;
    } else {
        compare_source(&actual_text, &expected_text, &options)?;
    }

    tracing::info!(actual = %actual.display(), expected = %expected.display(), "equivalent");
    Ok(())
}

/// Handles the `ast` subcommand.
pub fn handle_ast(path: &Path, normalize: bool) -> Result<(), CliError> {
    let source = read(path)?;
    let name = path.display().to_string();
    let statements = syntax::parse_named(&name, &source).map_err(|error| CompareError::Parse {
        side: Side::Actual,
        error,
    })?;

    let mut tree = Value::List(statements.into_iter().map(Value::from).collect());
    if normalize {
        normalize_tree(&mut tree);
    }
    println!("{}", tree.pretty());
    Ok(())
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_json(path: &Path, text: &str) -> Result<serde_json::Value, CliError> {
    serde_json::from_str(text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}
