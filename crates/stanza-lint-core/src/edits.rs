//! Edit planning for spacing violations.
//!
//! Every edit is anchored at column 0 of the line right after the offending
//! statement. A missing separator inserts one line terminator there; an extra
//! separator removes that line together with its terminator.

use serde::{Deserialize, Serialize};

use crate::grouping::{SpacingKind, SpacingViolation};
use crate::source::{SourceError, SourceText};

/// A byte-range text replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Text that replaces `start..end`.
    pub replacement: String,
}

impl TextEdit {
    /// Inserts `text` at `offset`.
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            start: offset,
            end: offset,
            replacement: text.into(),
        }
    }

    /// Removes `start..end`.
    #[must_use]
    pub fn remove(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            replacement: String::new(),
        }
    }
}

/// Diagnostic range plus the corrective edit for one violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEdit {
    /// Line the diagnostic points at (1-indexed).
    pub line: usize,
    /// Byte offset of the diagnostic range.
    pub offset: usize,
    /// Byte length of the diagnostic range, at least 1.
    pub length: usize,
    /// Corrective edit.
    pub edit: TextEdit,
}

/// Plans the diagnostic range and corrective edit for `violation`.
///
/// # Errors
///
/// Returns [`SourceError::OutOfRange`] if the anchor line does not exist.
pub fn plan_edit(
    violation: &SpacingViolation,
    source: &SourceText<'_>,
) -> Result<PlannedEdit, SourceError> {
    let anchor = violation.anchor;
    let offset = source.line_start(anchor)?;
    let length = source.line(anchor)?.len().max(1);

    let edit = match violation.kind {
        SpacingKind::MissingSeparator => {
            TextEdit::insert(offset, source.line_ending().as_str())
        }
        SpacingKind::ExtraSeparator => TextEdit::remove(offset, source.line_end(anchor)?),
    };

    Ok(PlannedEdit {
        line: anchor + 1,
        offset,
        length,
        edit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::Origin;
    use crate::statement::Span;

    fn violation(anchor: usize, kind: SpacingKind) -> SpacingViolation {
        SpacingViolation {
            anchor,
            kind,
            statement: Span::line(anchor),
            origin: Origin::TopLevel,
        }
    }

    #[test]
    fn missing_separator_inserts_before_next_line() {
        let source = SourceText::new("  version \"1\"\n  url \"x\"\n");
        let planned = plan_edit(&violation(1, SpacingKind::MissingSeparator), &source).unwrap();
        assert_eq!(planned.line, 2);
        assert_eq!(planned.offset, 14);
        assert_eq!(planned.length, 9);
        assert_eq!(planned.edit, TextEdit::insert(14, "\n"));
    }

    #[test]
    fn extra_separator_removes_line_and_terminator() {
        let source = SourceText::new("a\n\nb\n");
        let planned = plan_edit(&violation(1, SpacingKind::ExtraSeparator), &source).unwrap();
        assert_eq!(planned.offset, 2);
        assert_eq!(planned.length, 1);
        assert_eq!(planned.edit, TextEdit::remove(2, 3));
    }

    #[test]
    fn whitespace_only_line_is_removed_whole() {
        let source = SourceText::new("a\n   \nb\n");
        let planned = plan_edit(&violation(1, SpacingKind::ExtraSeparator), &source).unwrap();
        assert_eq!(planned.length, 3);
        assert_eq!(planned.edit, TextEdit::remove(2, 6));
    }

    #[test]
    fn crlf_insert_uses_crlf() {
        let source = SourceText::new("a\r\nc\r\n");
        let planned = plan_edit(&violation(1, SpacingKind::MissingSeparator), &source).unwrap();
        assert_eq!(planned.edit.replacement, "\r\n");
        assert_eq!(planned.edit.start, 3);
    }

    #[test]
    fn anchor_past_end_is_an_error() {
        let source = SourceText::new("a\n");
        assert!(plan_edit(&violation(1, SpacingKind::MissingSeparator), &source).is_err());
    }
}
