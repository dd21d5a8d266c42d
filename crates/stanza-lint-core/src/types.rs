//! Core types for lint violations and results.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::edits::TextEdit;

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file.
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A suggested fix for a violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
    /// Optional automatic replacement.
    pub replacement: Option<Replacement>,
}

impl Suggestion {
    /// Creates a new suggestion without automatic fix.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            replacement: None,
        }
    }

    /// Creates a new suggestion with automatic fix.
    #[must_use]
    pub fn with_fix(message: impl Into<String>, replacement: Replacement) -> Self {
        Self {
            message: message.into(),
            replacement: Some(replacement),
        }
    }
}

/// An automatic code replacement.
///
/// `location.offset` and `location.length` delimit the bytes replaced by
/// `new_text`; a zero length is an insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Replacement {
    /// Location to replace.
    pub location: Location,
    /// New text to insert.
    pub new_text: String,
}

impl Replacement {
    /// Creates a new replacement.
    #[must_use]
    pub fn new(location: Location, new_text: impl Into<String>) -> Self {
        Self {
            location,
            new_text: new_text.into(),
        }
    }

    /// Converts to a byte-range edit.
    #[must_use]
    pub fn to_edit(&self) -> TextEdit {
        TextEdit {
            start: self.location.offset,
            end: self.location.offset + self.location.length,
            replacement: self.new_text.clone(),
        }
    }
}

/// A lint violation found during analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "SL001").
    pub code: String,
    /// Rule name (e.g., "stanza-grouping").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    pub suggestion: Option<Suggestion>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Returns the automatic replacement, if any.
    #[must_use]
    pub fn replacement(&self) -> Option<&Replacement> {
        self.suggestion.as_ref().and_then(|s| s.replacement.as_ref())
    }

    /// Returns true if the violation carries an automatic fix.
    #[must_use]
    pub fn is_fixable(&self) -> bool {
        self.replacement().is_some()
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )?;
        if self.is_fixable() {
            write!(f, " (fixable)")?;
        }
        Ok(())
    }
}

/// A violation paired with its source text for rich rendering.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl ViolationDiagnostic {
    /// Builds a diagnostic for `violation` against the file's `content`.
    #[must_use]
    pub fn new(violation: &Violation, content: &str) -> Self {
        let offset = violation.location.offset.min(content.len());
        let length = violation.location.length.min(content.len() - offset);
        Self {
            message: format!("[{}] {}", violation.code, violation.message),
            help: violation.suggestion.as_ref().map(|s| s.message.clone()),
            source_code: NamedSource::new(
                violation.location.file.display().to_string(),
                content.to_owned(),
            ),
            span: SourceSpan::from((offset, length)),
            label_message: violation.rule.clone(),
        }
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Error)
    }

    /// Returns true if there are any warnings or errors.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity >= Severity::Warning)
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let errors = self
            .violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .count();
        let warnings = self
            .violations
            .iter()
            .filter(|v| v.severity == Severity::Warning)
            .count();
        let infos = self
            .violations
            .iter()
            .filter(|v| v.severity == Severity::Info)
            .count();
        (errors, warnings, infos)
    }

    /// Counts violations that carry an automatic fix.
    #[must_use]
    pub fn fixable_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_fixable()).count()
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Adds violations from another result.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.files_checked += other.files_checked;
    }

    /// Sorts violations by file, then line, then column.
    pub fn sort(&mut self) {
        self.violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });
    }
}
