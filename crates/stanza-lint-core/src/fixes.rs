//! Batch application of text edits.

use thiserror::Error;

use crate::edits::TextEdit;

/// Errors raised while applying edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixError {
    /// An edit does not fit the text.
    #[error("invalid edit range {start}..{end} for text length {len}")]
    InvalidRange {
        /// Edit start.
        start: usize,
        /// Edit end.
        end: usize,
        /// Text length.
        len: usize,
    },
}

/// Result of applying a batch of edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// Text after all applied edits.
    pub text: String,
    /// Number of edits applied.
    pub applied: usize,
    /// Number of edits dropped because they overlapped an earlier one.
    pub skipped: usize,
}

/// Applies `edits` to `text` in one batch.
///
/// Edits are ordered by position; an edit starting inside the range of an
/// earlier one is dropped. Insertions at the same offset are all kept.
///
/// # Errors
///
/// Returns [`FixError::InvalidRange`] if an edit lies outside `text` or does
/// not fall on a character boundary.
pub fn apply_edits(text: &str, mut edits: Vec<TextEdit>) -> Result<FixOutcome, FixError> {
    edits.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));

    let mut kept: Vec<TextEdit> = Vec::with_capacity(edits.len());
    let mut last_end = 0_usize;
    let mut skipped = 0_usize;

    for edit in edits {
        if edit.start < last_end {
            skipped += 1;
            continue;
        }
        last_end = edit.end;
        kept.push(edit);
    }

    let mut out = text.to_owned();
    for edit in kept.iter().rev() {
        if edit.start > edit.end
            || edit.end > out.len()
            || !out.is_char_boundary(edit.start)
            || !out.is_char_boundary(edit.end)
        {
            return Err(FixError::InvalidRange {
                start: edit.start,
                end: edit.end,
                len: text.len(),
            });
        }
        out.replace_range(edit.start..edit.end, &edit.replacement);
    }

    Ok(FixOutcome {
        text: out,
        applied: kept.len(),
        skipped,
    })
}
