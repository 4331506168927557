// Runs the YAML comparison suites under tests/suites through the library harness.

use std::path::Path;

use compare_ast::test_harness::{
    discover_yaml_files, load_test_cases, run_all_tests, run_test_case, TestConfig, TestResult,
};

const SUITES: &str = "tests/suites";

#[test]
fn test_suites_are_discovered() {
    let files = discover_yaml_files(SUITES);
    assert!(files.len() >= 3, "found {:?}", files);
    for file in &files {
        assert!(!load_test_cases(file).unwrap().is_empty(), "{} is empty", file.display());
    }
}

#[test]
fn test_every_case_passes() {
    let mut failures = Vec::new();
    for file in discover_yaml_files(SUITES) {
        let name = file.display().to_string();
        for case in load_test_cases(&file).unwrap() {
            if case.skip {
                continue;
            }
            if let TestResult::Fail { name, error, detail, .. } = run_test_case(&name, &case) {
                failures.push(format!("{}: {} ({:?})", name, error, detail));
            }
        }
    }
    assert!(failures.is_empty(), "failing cases:\n{}", failures.join("\n"));
}

#[test]
fn test_run_all_tests_summary() {
    let config = TestConfig {
        use_colors: false,
        verbose: false,
    };
    let summary = run_all_tests(Path::new(SUITES), None, &config);
    assert_eq!(summary.failed, 0);
    assert!(summary.passed > 0);
}

#[test]
fn test_filter_skips_other_cases() {
    let config = TestConfig {
        use_colors: false,
        verbose: false,
    };
    let summary = run_all_tests(Path::new(SUITES), Some("double string"), &config);
    assert_eq!(summary.passed, 2);
    assert_eq!(summary.failed, 0);
    assert!(summary.skipped > 0);
}
