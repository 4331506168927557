//! YAML Comparison Suites
//!
//! Discovers YAML files of comparison cases, runs each case through
//! [`compare_source`], and reports the outcome against the expected result
//! kind.
//!
//! # Test Format
//!
//! ```yaml
//! - name: "dot access matches bracket access"
//!   actual: "a.b;"
//!   expected: "a['b'];"
//!   var_pattern: "_v\\d_"      # optional
//!   string_pattern: "_s\\d_"   # optional
//!   expect: match              # match | parse | rebinding | mismatch
//!   skip: false                # optional
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use compare_ast::test_harness::{run_all_tests, TestConfig};
//! use std::path::Path;
//!
//! let config = TestConfig::default();
//! let summary = run_all_tests(Path::new("tests/suites"), None, &config);
//! if summary.failed > 0 {
//!     std::process::exit(1);
//! }
//! ```

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use walkdir::WalkDir;

use crate::engine::compare_source;
use crate::errors::ErrorKind;
use crate::options::OptionsFile;

// =============================================================================
// CORE TYPES
// =============================================================================

/// The outcome a case asserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    #[default]
    Match,
    Parse,
    Rebinding,
    Mismatch,
}

impl From<ErrorKind> for Expectation {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Parse => Expectation::Parse,
            ErrorKind::Rebinding => Expectation::Rebinding,
            ErrorKind::Mismatch => Expectation::Mismatch,
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Expectation::Match => "match",
            Expectation::Parse => "parse",
            Expectation::Rebinding => "rebinding",
            Expectation::Mismatch => "mismatch",
        };
        f.write_str(text)
    }
}

/// A single YAML comparison case.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TestCase {
    pub name: String,
    pub actual: String,
    pub expected: String,
    pub var_pattern: Option<String>,
    pub string_pattern: Option<String>,
    #[serde(default)]
    pub expect: Expectation,
    #[serde(default)]
    pub skip: bool,
}

#[derive(Debug, Clone)]
pub enum TestResult {
    Pass {
        file: String,
        name: String,
    },
    Fail {
        file: String,
        name: String,
        error: String,
        detail: Option<String>,
    },
    Skipped {
        file: String,
        name: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Configuration for test execution and reporting.
pub struct TestConfig {
    pub use_colors: bool,
    pub verbose: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
            verbose: false,
        }
    }
}

impl TestConfig {
    fn color_choice(&self) -> ColorChoice {
        if self.use_colors {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        }
    }
}

// =============================================================================
// TEST DISCOVERY AND LOADING
// =============================================================================

/// Discovers all YAML files recursively under `root`, in a stable order.
pub fn discover_yaml_files<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// Loads the cases in one YAML file.
pub fn load_test_cases(path: &Path) -> Result<Vec<TestCase>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_yaml::from_str::<Vec<TestCase>>(&content)
        .map_err(|e| format!("Failed to parse YAML in {}: {}", path.display(), e))
}

pub fn skip_reason(case: &TestCase, filter: Option<&str>) -> Option<String> {
    if case.skip {
        return Some("Marked 'skip'".to_string());
    }
    if let Some(f) = filter {
        if !case.name.to_lowercase().contains(&f.to_lowercase()) {
            return Some(format!("Filtered out by substring: {}", f));
        }
    }
    None
}

// =============================================================================
// MAIN TEST EXECUTION
// =============================================================================

/// Runs one case and checks its outcome kind.
pub fn run_test_case(file: &str, case: &TestCase) -> TestResult {
    let fail = |error: String, detail: Option<String>| TestResult::Fail {
        file: file.to_string(),
        name: case.name.clone(),
        error,
        detail,
    };

    let settings = OptionsFile {
        var_pattern: case.var_pattern.clone(),
        string_pattern: case.string_pattern.clone(),
    };
    let options = match settings.compile() {
        Ok(options) => options,
        Err(e) => return fail(format!("Invalid case options: {}", e), None),
    };

    let (outcome, detail) = match compare_source(&case.actual, &case.expected, &options) {
        Ok(()) => (Expectation::Match, None),
        Err(e) => (Expectation::from(e.kind()), Some(e.to_string())),
    };

    if outcome == case.expect {
        TestResult::Pass {
            file: file.to_string(),
            name: case.name.clone(),
        }
    } else {
        fail(format!("expected {}, got {}", case.expect, outcome), detail)
    }
}

/// Runs every case found under `root`.
pub fn run_all_tests(root: &Path, filter: Option<&str>, config: &TestConfig) -> TestSummary {
    let mut results = Vec::new();
    for path in discover_yaml_files(root) {
        let file = path.display().to_string();
        let cases = match load_test_cases(&path) {
            Ok(cases) => cases,
            Err(error) => {
                results.push(TestResult::Fail {
                    file: file.clone(),
                    name: "<suite>".to_string(),
                    error,
                    detail: None,
                });
                continue;
            }
        };
        for case in &cases {
            let result = match skip_reason(case, filter) {
                Some(reason) => TestResult::Skipped {
                    file: file.clone(),
                    name: case.name.clone(),
                    reason,
                },
                None => run_test_case(&file, case),
            };
            results.push(result);
        }
    }

    let mut stdout = StandardStream::stdout(config.color_choice());
    let _ = report_results(&mut stdout, &results, config);
    partition_results(&results)
}

/// Entry point for the `test_runner` binary: `[PATH] [FILTER]`.
pub fn run_tests_with_args(args: &[String]) -> TestSummary {
    let root = args.first().map(String::as_str).unwrap_or("tests/suites");
    let filter = args.get(1).map(String::as_str);
    run_all_tests(Path::new(root), filter, &TestConfig::default())
}

// =============================================================================
// REPORTING AND OUTPUT
// =============================================================================

pub fn partition_results(results: &[TestResult]) -> TestSummary {
    let mut summary = TestSummary::default();
    for result in results {
        match result {
            TestResult::Pass { .. } => summary.passed += 1,
            TestResult::Fail { .. } => summary.failed += 1,
            TestResult::Skipped { .. } => summary.skipped += 1,
        }
    }
    summary
}

pub fn report_results(
    out: &mut dyn WriteColor,
    results: &[TestResult],
    config: &TestConfig,
) -> std::io::Result<()> {
    for result in results {
        match result {
            TestResult::Pass { file, name } => {
                label(out, Color::Green, "PASS")?;
                writeln!(out, ": {} [{}]", name, file)?;
            }
            TestResult::Fail {
                file,
                name,
                error,
                detail,
            } => {
                label(out, Color::Red, "FAIL")?;
                writeln!(out, ": {} [{}]", name, file)?;
                writeln!(out, "  {}", error)?;
                if config.verbose {
                    if let Some(detail) = detail {
                        writeln!(out, "  {}", detail)?;
                    }
                }
            }
            TestResult::Skipped { file, name, reason } => {
                label(out, Color::Yellow, "SKIP")?;
                writeln!(out, ": {} [{}] ({})", name, file, reason)?;
            }
        }
    }

    let summary = partition_results(results);
    writeln!(
        out,
        "\n{} passed, {} failed, {} skipped ({} total)",
        summary.passed,
        summary.failed,
        summary.skipped,
        results.len()
    )
}

fn label(out: &mut dyn WriteColor, color: Color, text: &str) -> std::io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{}", text)?;
    out.reset()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(actual: &str, expected: &str, expect: Expectation) -> TestCase {
        TestCase {
            name: "case".into(),
            actual: actual.into(),
            expected: expected.into(),
            var_pattern: None,
            string_pattern: None,
            expect,
            skip: false,
        }
    }

    #[test]
    fn test_case_yaml_defaults() {
        let cases: Vec<TestCase> =
            serde_yaml::from_str("- name: n\n  actual: 'a;'\n  expected: 'a;'\n").unwrap();
        assert_eq!(cases[0].expect, Expectation::Match);
        assert!(!cases[0].skip);
    }

    #[test]
    fn test_run_case_outcomes() {
        assert!(matches!(
            run_test_case("f", &case("a.b;", "a['b'];", Expectation::Match)),
            TestResult::Pass { .. }
        ));
        assert!(matches!(
            run_test_case("f", &case("a.b;", "3;", Expectation::Mismatch)),
            TestResult::Pass { .. }
        ));
        match run_test_case("f", &case("a.b;", "3;", Expectation::Match)) {
            TestResult::Fail { error, .. } => assert_eq!(error, "expected match, got mismatch"),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let mut c = case("a;", "a;", Expectation::Match);
        c.name = "Dot Access".into();
        assert!(skip_reason(&c, Some("dot")).is_none());
        assert!(skip_reason(&c, Some("bracket")).is_some());
    }
}
