//! Output formatting for lint results.

use anyhow::Result;
use miette::GraphicalReportHandler;
use serde::Serialize;
use stanza_lint_core::{LintResult, Severity, Violation, ViolationDiagnostic};
use std::collections::HashMap;
use std::path::Path;

use crate::OutputFormat;

/// Counts reported after `--fix`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FixSummary {
    /// Files rewritten.
    pub files_fixed: usize,
    /// Edits applied.
    pub edits_applied: usize,
    /// Edits dropped as overlapping.
    pub edits_skipped: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files_checked: usize,
    violations: &'a [Violation],
    #[serde(skip_serializing_if = "Option::is_none")]
    fixes: Option<&'a FixSummary>,
}

/// Prints lint results in the specified format.
///
/// `root` is the analyzed path; reported file paths are relative to it.
pub fn print(
    result: &LintResult,
    fixes: Option<&FixSummary>,
    format: OutputFormat,
    root: &Path,
) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result, fixes),
        OutputFormat::Json => return print_json(result, fixes),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Pretty => print_pretty(result, fixes, root),
    }
    Ok(())
}

fn print_text(result: &LintResult, fixes: Option<&FixSummary>) {
    for violation in &result.violations {
        let marker = if violation.is_fixable() { " [*]" } else { "" };
        println!(
            "{}:{}:{}: {} {}{}",
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
            violation.code,
            violation.rule,
            marker,
        );
        println!("  {}: {}", paint(violation.severity), violation.message);
        if let Some(suggestion) = &violation.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }

    print_summary(result, fixes);
}

fn paint(severity: Severity) -> String {
    let color = match severity {
        Severity::Error => 31,
        Severity::Warning => 33,
        Severity::Info => 34,
    };
    format!("\x1b[{color}m{severity}\x1b[0m")
}

fn print_summary(result: &LintResult, fixes: Option<&FixSummary>) {
    let (errors, warnings, infos) = result.count_by_severity();

    if let Some(fixes) = fixes {
        println!(
            "Fixed {} file(s) with {} edit(s)",
            fixes.files_fixed, fixes.edits_applied
        );
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );

    let fixable = result.fixable_count();
    if fixable > 0 && fixes.is_none() {
        println!("{fixable} violation(s) fixable with `stanza-lint check --fix`");
    }
}

fn print_json(result: &LintResult, fixes: Option<&FixSummary>) -> Result<()> {
    let report = JsonReport {
        files_checked: result.files_checked,
        violations: &result.violations,
        fixes,
    };
    let json = serde_json::to_string_pretty(&report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}

fn print_pretty(result: &LintResult, fixes: Option<&FixSummary>, root: &Path) {
    let base = if root.is_file() {
        root.parent().unwrap_or(root)
    } else {
        root
    };

    let handler = GraphicalReportHandler::new();
    let mut sources: HashMap<&Path, String> = HashMap::new();

    for violation in &result.violations {
        let file = violation.location.file.as_path();
        let content = sources
            .entry(file)
            .or_insert_with(|| read_source(&base.join(file)));

        let diagnostic = ViolationDiagnostic::new(violation, content);
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, &diagnostic) {
            Ok(()) => println!("{rendered}"),
            Err(_) => println!("{}", violation.format()),
        }
    }

    print_summary(result, fixes);
}

fn read_source(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        tracing::warn!("Cannot read {} for display: {}", path.display(), e);
        String::new()
    })
}
