// Runs the YAML comparison suites through the shared test_harness module.
// Usage: cargo run --bin test_runner [path] [filter]

use compare_ast::test_harness;
use std::env;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let summary = test_harness::run_tests_with_args(&args);
    if summary.failed > 0 {
        std::process::exit(1);
    }
}
