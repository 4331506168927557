//! User-facing output for the CLI: coloured tree diffs and failure reports.

use std::io::{self, Write};

use difference::{Changeset, Difference};
use termcolor::{Color, ColorSpec, WriteColor};

use crate::errors::CompareError;

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Writes a human-readable report for a failed comparison.
///
/// Parse failures go through miette so the offending source is shown.
pub fn write_failure(out: &mut dyn WriteColor, error: &CompareError) -> io::Result<()> {
    match error {
        CompareError::Parse { .. } | CompareError::Tree { .. } => {
            headline(out, Color::Red, "parse failure")?;
            write!(out, "{}", render_diagnostic(error))
        }
        CompareError::Rebinding { .. } => {
            headline(out, Color::Yellow, "rebinding conflict")?;
            writeln!(out, "{}", error)
        }
        CompareError::Mismatch {
            path,
            reason,
            actual,
            expected,
        } => {
            headline(out, Color::Red, "structural mismatch")?;
            writeln!(out, "at {}: {}", path, reason)?;
            writeln!(out)?;
            write_tree_diff(out, &expected.pretty(), &actual.pretty())
        }
    }
}

/// Line diff from `expected` to `actual`: removed lines are template-only,
/// added lines are generated-only.
pub fn write_tree_diff(out: &mut dyn WriteColor, expected: &str, actual: &str) -> io::Result<()> {
    let changeset = Changeset::new(expected, actual, "\n");
    for diff in &changeset.diffs {
        let (marker, color, chunk) = match diff {
            Difference::Same(x) => (' ', None, x),
            Difference::Add(x) => ('+', Some(Color::Green), x),
            Difference::Rem(x) => ('-', Some(Color::Red), x),
        };
        out.set_color(ColorSpec::new().set_fg(color))?;
        for line in chunk.lines() {
            writeln!(out, "{}{}", marker, line)?;
        }
    }
    out.reset()
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn headline(out: &mut dyn WriteColor, color: Color, text: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    writeln!(out, "{}", text)?;
    out.reset()
}

/// Renders a diagnostic with miette's graphical handler, source snippet included.
fn render_diagnostic(error: &CompareError) -> String {
    let mut rendered = String::new();
    let handler =
        miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor());
    if handler.render_report(&mut rendered, error).is_err() {
        return error.to_string();
    }
    rendered
}
